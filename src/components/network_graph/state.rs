use log::{info, warn};

use super::error::{InvalidPattern, MalformedTopology};
use super::filter::Filter;
use super::geometry::{EdgePath, resolve_edge};
use super::interaction::InteractionController;
use super::model::GraphModel;
use super::simulation::{ForceConfig, ForceSimulation};
use super::types::{Connection, EntityKey, HostNode, Topology};
use super::viewport::ViewTransform;

/// The model item behind an [`EntityFrame`].
#[derive(Clone, Copy, Debug)]
pub enum EntityData<'a> {
	/// A host
	Node(&'a HostNode),
	/// A connection
	Connection(&'a Connection),
}

/// One entity as handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct EntityFrame<'a> {
	/// What is drawn
	pub data: EntityData<'a>,
	/// World position
	pub x: f64,
	/// World position
	pub y: f64,
	/// Drawn radius
	pub radius: f64,
	/// Held by a drag
	pub pinned: bool,
}

/// Everything the renderer needs for one frame, in world coordinates.
#[derive(Clone, Debug, Default)]
pub struct RenderFeed<'a> {
	/// Hosts, then connections
	pub entities: Vec<EntityFrame<'a>>,
	/// One path per link
	pub edges: Vec<EdgePath>,
}

/// Turns animation-frame timestamps (ms) into step lengths in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
	last: Option<f64>,
}

impl FrameClock {
	/// Step since the previous frame, clamped to `[0, 0.1]`. The first frame
	/// assumes 60 Hz.
	pub fn step(&mut self, now: f64) -> f64 {
		let dt = self
			.last
			.map_or(0.016, |last| ((now - last) / 1000.0).clamp(0.0, 0.1));
		self.last = Some(now);
		dt
	}
}

/// Owns the source topology, the active (filtered) model, the simulation and
/// the input controller for one canvas.
pub struct NetworkGraphState {
	source: GraphModel,
	model: GraphModel,
	filter: Filter,
	sim: ForceSimulation,
	controller: InteractionController,
	/// Viewport width
	pub width: f64,
	/// Viewport height
	pub height: f64,
	torn_down: bool,
}

impl NetworkGraphState {
	/// State with default physics.
	pub fn new(topology: &Topology, width: f64, height: f64) -> Self {
		Self::with_config(topology, ForceConfig::default(), width, height)
	}

	/// State with the given physics constants.
	pub fn with_config(topology: &Topology, config: ForceConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			source: GraphModel::default(),
			model: GraphModel::default(),
			filter: Filter::default(),
			sim: ForceSimulation::new(config, width, height),
			controller: InteractionController::new(width, height),
			width,
			height,
			torn_down: false,
		};
		state.set_topology(topology);
		state
	}

	// =========================================================================
	// MODEL
	// =========================================================================

	/// Rebuilds from a new topology and re-applies the active filter.
	/// Edges that could not be resolved are returned.
	pub fn set_topology(&mut self, topology: &Topology) -> Vec<MalformedTopology> {
		let (source, issues) = GraphModel::build(topology);
		let model = match self.filter.apply(&source) {
			Ok(model) => model,
			Err(err) => {
				warn!("{err}; showing unfiltered topology");
				self.filter = Filter::default();
				source.clone()
			}
		};
		self.source = source;
		self.install(model);
		issues
	}

	/// Filters the source topology. On an invalid pattern the current model
	/// and filter stay in place.
	pub fn apply_filter(&mut self, filter: Filter) -> Result<(), InvalidPattern> {
		let model = filter.apply(&self.source)?;
		info!(
			"filter applied: {} of {} nodes visible",
			model.nodes().len(),
			self.source.nodes().len()
		);
		self.filter = filter;
		self.install(model);
		Ok(())
	}

	fn install(&mut self, model: GraphModel) {
		self.model = model;
		self.sim.set_model(&self.model);
		self.controller.forget_missing(&mut self.sim);
	}

	/// Model currently shown.
	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	/// Filter currently applied.
	pub fn filter(&self) -> &Filter {
		&self.filter
	}

	/// The layout.
	pub fn simulation(&self) -> &ForceSimulation {
		&self.sim
	}

	/// The input state machine.
	pub fn controller(&self) -> &InteractionController {
		&self.controller
	}

	/// Current view transform.
	pub fn transform(&self) -> ViewTransform {
		self.controller.transform()
	}

	// =========================================================================
	// LIFECYCLE
	// =========================================================================

	/// One frame: advances view animations by `dt` seconds and the layout by
	/// one step. Returns whether the layout moved. No-op after teardown.
	pub fn tick(&mut self, dt: f64) -> bool {
		if self.torn_down {
			return false;
		}
		self.controller.advance(dt);
		self.sim.tick()
	}

	/// Re-centers and re-heats once for a changed viewport size.
	pub fn resize(&mut self, width: f64, height: f64) {
		if self.torn_down || (width == self.width && height == self.height) {
			return;
		}
		self.width = width;
		self.height = height;
		self.sim.resize(width, height);
		self.controller.resize(width, height);
	}

	/// Detaches this state. Any later tick or input is ignored.
	pub fn teardown(&mut self) {
		if !self.torn_down {
			info!("network graph torn down");
			self.torn_down = true;
			self.controller.pointer_up(&mut self.sim);
		}
	}

	/// Whether [`Self::teardown`] ran.
	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	// =========================================================================
	// INPUT
	// =========================================================================

	/// Topmost entity under a screen point.
	pub fn entity_at(&self, sx: f64, sy: f64) -> Option<&EntityKey> {
		let (wx, wy) = self.transform().screen_to_world(sx, sy);
		self.sim.entity_at(wx, wy)
	}

	/// Forwards to [`InteractionController::pointer_down`].
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if !self.torn_down {
			self.controller.pointer_down(sx, sy, &mut self.sim);
		}
	}

	/// Forwards to [`InteractionController::pointer_move`].
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.torn_down {
			self.controller.pointer_move(sx, sy, &mut self.sim);
		}
	}

	/// Ends a drag or pan.
	pub fn pointer_up(&mut self) {
		if !self.torn_down {
			self.controller.pointer_up(&mut self.sim);
		}
	}

	/// Zooms at the pointer.
	pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) {
		if !self.torn_down {
			self.controller.wheel(delta_y, sx, sy);
		}
	}

	/// Animated zoom in.
	pub fn zoom_in(&mut self) {
		if !self.torn_down {
			self.controller.zoom_in();
		}
	}

	/// Animated zoom out.
	pub fn zoom_out(&mut self) {
		if !self.torn_down {
			self.controller.zoom_out();
		}
	}

	/// Pans by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if !self.torn_down {
			self.controller.pan_by(dx, dy);
		}
	}

	// =========================================================================
	// OUTPUT
	// =========================================================================

	/// Entities (nodes, then connections on top) and trimmed edge paths.
	pub fn render_feed(&self) -> RenderFeed<'_> {
		let nodes = self
			.model
			.nodes()
			.iter()
			.map(|n| (EntityKey::node(&n.id), EntityData::Node(n)));
		let connections = self
			.model
			.connections()
			.iter()
			.map(|c| (EntityKey::connection(&c.id), EntityData::Connection(c)));

		let entities = nodes
			.chain(connections)
			.filter_map(|(key, data)| {
				let e = self.sim.entity(&key)?;
				Some(EntityFrame {
					data,
					x: e.x,
					y: e.y,
					radius: e.radius,
					pinned: e.is_pinned(),
				})
			})
			.collect();
		let edges = self
			.sim
			.link_endpoints()
			.map(|(s, t)| resolve_edge((s.x, s.y), s.radius, (t.x, t.y), t.radius))
			.collect();

		RenderFeed { entities, edges }
	}
}
