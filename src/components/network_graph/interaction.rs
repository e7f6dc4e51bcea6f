//! Pointer, wheel and button input as an explicit state machine.
//!
//! ```text
//! Idle ──down on entity──▶ DraggingEntity ──up/leave──▶ Idle
//! Idle ──down on canvas──▶ Panning        ──up/leave──▶ Idle
//! Idle ──zoom in/out─────▶ Zooming        ──finished──▶ Idle
//! Zooming ──down/wheel───▶ (animation stops where it is) ▶ Idle ▶ ...
//! ```
//!
//! Wheel zoom applies immediately in any state. Drag writes pins into the
//! simulation; everything else only touches the view transform.

use log::debug;

use super::simulation::ForceSimulation;
use super::types::EntityKey;
use super::viewport::{
	ViewTransform, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR, ZoomAnimation,
};

/// What the pointer is currently doing.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	/// Nothing in progress
	Idle,
	/// Background drag
	Panning {
		/// Last pointer x in screen space
		last_x: f64,
		/// Last pointer y in screen space
		last_y: f64,
	},
	/// An entity follows the pointer
	DraggingEntity {
		/// The pinned entity
		key: EntityKey,
	},
	/// Programmatic zoom in flight
	Zooming(ZoomAnimation),
}

/// Owns the view transform and turns input into transform changes or pins.
#[derive(Clone, Debug)]
pub struct InteractionController {
	transform: ViewTransform,
	gesture: Gesture,
	width: f64,
	height: f64,
}

impl InteractionController {
	/// Identity transform on a `width` x `height` viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::default(),
			gesture: Gesture::Idle,
			width,
			height,
		}
	}

	/// Current world-to-screen transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Gesture in progress.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Key of the entity being dragged.
	pub fn dragged(&self) -> Option<&EntityKey> {
		match &self.gesture {
			Gesture::DraggingEntity { key } => Some(key),
			_ => None,
		}
	}

	/// New viewport size for centered zoom.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Stops a running zoom animation where it currently is.
	fn interrupt_zoom(&mut self) {
		if let Gesture::Zooming(anim) = &self.gesture {
			self.transform = anim.current();
			self.gesture = Gesture::Idle;
		}
	}

	// =========================================================================
	// POINTER
	// =========================================================================

	/// Starts a drag on the topmost entity under the pointer, else a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, sim: &mut ForceSimulation) {
		self.interrupt_zoom();
		if self.gesture != Gesture::Idle {
			return;
		}

		let (wx, wy) = self.transform.screen_to_world(sx, sy);
		match sim.entity_at(wx, wy).cloned() {
			Some(key) => {
				sim.pin(&key, wx, wy);
				sim.reheat();
				sim.set_alpha_target(sim.config.drag_alpha_target);
				debug!("drag start {key}");
				self.gesture = Gesture::DraggingEntity { key };
			}
			None => {
				self.gesture = Gesture::Panning {
					last_x: sx,
					last_y: sy,
				};
			}
		}
	}

	/// Moves the pin or pans, depending on the gesture.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, sim: &mut ForceSimulation) {
		match &mut self.gesture {
			Gesture::DraggingEntity { key } => {
				let (wx, wy) = self.transform.screen_to_world(sx, sy);
				sim.pin(key, wx, wy);
			}
			Gesture::Panning { last_x, last_y } => {
				let (dx, dy) = (sx - *last_x, sy - *last_y);
				*last_x = sx;
				*last_y = sy;
				self.transform = self.transform.panned(dx, dy);
			}
			Gesture::Idle | Gesture::Zooming(_) => {}
		}
	}

	/// Ends a drag or pan. Also used when the pointer leaves the canvas.
	pub fn pointer_up(&mut self, sim: &mut ForceSimulation) {
		match std::mem::replace(&mut self.gesture, Gesture::Idle) {
			Gesture::DraggingEntity { key } => {
				sim.unpin(&key);
				sim.set_alpha_target(0.0);
				debug!("drag end {key}");
			}
			Gesture::Zooming(anim) => self.gesture = Gesture::Zooming(anim),
			Gesture::Idle | Gesture::Panning { .. } => {}
		}
	}

	/// Drops a drag whose entity no longer exists in the simulation.
	pub fn forget_missing(&mut self, sim: &mut ForceSimulation) {
		if self.dragged().is_some_and(|key| !sim.contains(key)) {
			self.gesture = Gesture::Idle;
			sim.set_alpha_target(0.0);
		}
	}

	// =========================================================================
	// ZOOM / PAN
	// =========================================================================

	/// Wheel zoom anchored at the pointer.
	pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) {
		if delta_y == 0.0 {
			return;
		}
		self.interrupt_zoom();
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else {
			WHEEL_ZOOM_IN
		};
		self.transform = self.transform.zoomed_at(factor, sx, sy);
	}

	/// Animated zoom in around the viewport center.
	pub fn zoom_in(&mut self) {
		self.zoom_by(ZOOM_IN_FACTOR);
	}

	/// Animated zoom out around the viewport center.
	pub fn zoom_out(&mut self) {
		self.zoom_by(ZOOM_OUT_FACTOR);
	}

	/// Animated zoom around the viewport center. Repeated requests compound
	/// on the previous target.
	pub fn zoom_by(&mut self, factor: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let (from, base) = match &self.gesture {
			Gesture::Zooming(anim) => (anim.current(), anim.target()),
			Gesture::Idle => (self.transform, self.transform),
			// a gesture owns the transform; apply without animation
			Gesture::Panning { .. } | Gesture::DraggingEntity { .. } => {
				self.transform = self.transform.zoomed_at(factor, cx, cy);
				return;
			}
		};
		let to = base.zoomed_at(factor, cx, cy);
		self.transform = from;
		self.gesture = Gesture::Zooming(ZoomAnimation::new(from, to));
	}

	/// Direct pan by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.interrupt_zoom();
		self.transform = self.transform.panned(dx, dy);
	}

	/// Advances animations by `dt` seconds.
	pub fn advance(&mut self, dt: f64) {
		if let Gesture::Zooming(anim) = &mut self.gesture {
			self.transform = anim.step(dt);
			if anim.is_finished() {
				self.gesture = Gesture::Idle;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::model::GraphModel;
	use crate::components::network_graph::simulation::ForceConfig;
	use crate::components::network_graph::types::{Connection, HostNode, RawEdge, Topology};
	use crate::components::network_graph::viewport::{MAX_SCALE, MIN_SCALE, ZOOM_DURATION};

	fn setup() -> (InteractionController, ForceSimulation) {
		let topology = Topology {
			nodes: vec![
				HostNode {
					id: "web".into(),
					os: "Linux".into(),
					node_type: "server".into(),
				},
				HostNode {
					id: "laptop".into(),
					os: "Windows".into(),
					node_type: "client".into(),
				},
			],
			connections: vec![Connection {
				id: "https".into(),
				protocol: "TCP".into(),
				source_port: "50123".into(),
				target_port: "443".into(),
				description: String::new(),
			}],
			edges: vec![RawEdge {
				source: "laptop".into(),
				target: "web".into(),
				connection: "https".into(),
			}],
		};
		let (model, _) = GraphModel::build(&topology);
		let mut sim = ForceSimulation::new(ForceConfig::default(), 800.0, 600.0);
		sim.set_model(&model);
		(InteractionController::new(800.0, 600.0), sim)
	}

	fn screen_pos(
		ctl: &InteractionController,
		sim: &ForceSimulation,
		key: &EntityKey,
	) -> (f64, f64) {
		let e = sim.entity(key).unwrap();
		ctl.transform().world_to_screen(e.x, e.y)
	}

	#[test]
	fn test_drag_pins_and_releases() {
		let (mut ctl, mut sim) = setup();
		let key = EntityKey::node("web");
		while sim.tick() {}
		let (sx, sy) = screen_pos(&ctl, &sim, &key);

		ctl.pointer_down(sx, sy, &mut sim);
		assert_eq!(ctl.dragged(), Some(&key));
		assert!(sim.entity(&key).unwrap().is_pinned());
		assert_eq!(sim.alpha(), 1.0);
		assert_eq!(sim.alpha_target(), sim.config.drag_alpha_target);

		ctl.pointer_move(sx + 50.0, sy - 20.0, &mut sim);
		sim.tick();
		let e = sim.entity(&key).unwrap();
		assert_eq!((e.x, e.y), ctl.transform().screen_to_world(sx + 50.0, sy - 20.0));

		ctl.pointer_up(&mut sim);
		assert_eq!(ctl.gesture(), &Gesture::Idle);
		assert!(!sim.entity(&key).unwrap().is_pinned());
		assert_eq!(sim.alpha_target(), 0.0);
	}

	#[test]
	fn test_drag_under_zoom_uses_world_coordinates() {
		let (mut ctl, mut sim) = setup();
		ctl.wheel(-1.0, 0.0, 0.0);
		ctl.pan_by(35.0, -12.0);
		let key = EntityKey::connection("https");
		let (sx, sy) = screen_pos(&ctl, &sim, &key);

		ctl.pointer_down(sx, sy, &mut sim);
		assert_eq!(ctl.dragged(), Some(&key));
		let e = sim.entity(&key).unwrap();
		let (wx, wy) = ctl.transform().screen_to_world(sx, sy);
		assert_eq!((e.fx, e.fy), (Some(wx), Some(wy)));
	}

	#[test]
	fn test_background_drag_pans() {
		let (mut ctl, mut sim) = setup();
		let before = sim.entities().to_vec();

		ctl.pointer_down(5.0, 5.0, &mut sim);
		assert!(matches!(ctl.gesture(), Gesture::Panning { .. }));
		ctl.pointer_move(25.0, 15.0, &mut sim);
		ctl.pointer_move(30.0, 10.0, &mut sim);
		ctl.pointer_up(&mut sim);

		let t = ctl.transform();
		assert_eq!((t.x, t.y, t.k), (25.0, 5.0, 1.0));
		assert_eq!(sim.entities(), &before[..]);
	}

	#[test]
	fn test_wheel_zoom_anchors_on_pointer() {
		let (mut ctl, _) = setup();
		let before = ctl.transform().screen_to_world(120.0, 80.0);
		ctl.wheel(-3.0, 120.0, 80.0);
		let after = ctl.transform().screen_to_world(120.0, 80.0);
		assert!(ctl.transform().k > 1.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn test_button_zoom_animates() {
		let (mut ctl, _) = setup();
		ctl.zoom_in();
		assert!(matches!(ctl.gesture(), Gesture::Zooming(_)));
		assert_eq!(ctl.transform().k, 1.0);

		ctl.advance(ZOOM_DURATION / 3.0);
		let k = ctl.transform().k;
		assert!(k > 1.0 && k < ZOOM_IN_FACTOR);

		ctl.advance(ZOOM_DURATION);
		assert_eq!(ctl.gesture(), &Gesture::Idle);
		assert!((ctl.transform().k - ZOOM_IN_FACTOR).abs() < 1e-12);
	}

	#[test]
	fn test_button_zoom_keeps_viewport_center() {
		let (mut ctl, _) = setup();
		let before = ctl.transform().screen_to_world(400.0, 300.0);
		ctl.zoom_in();
		ctl.advance(1.0);

		let t = ctl.transform();
		let after = t.screen_to_world(400.0, 300.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		// not a plain scale about the top-left corner
		assert!(t.x < 0.0 && t.y < 0.0);
	}

	#[test]
	fn test_pointer_down_interrupts_zoom() {
		let (mut ctl, mut sim) = setup();
		ctl.zoom_out();
		ctl.advance(ZOOM_DURATION / 2.0);
		let mid = ctl.transform();

		ctl.pointer_down(1.0, 1.0, &mut sim);
		assert!(matches!(ctl.gesture(), Gesture::Panning { .. }));
		assert_eq!(ctl.transform(), mid);
	}

	#[test]
	fn test_repeated_zoom_requests_compound() {
		let (mut ctl, _) = setup();
		ctl.zoom_in();
		ctl.zoom_in();
		ctl.advance(1.0);
		assert!((ctl.transform().k - ZOOM_IN_FACTOR * ZOOM_IN_FACTOR).abs() < 1e-9);
	}

	#[test]
	fn test_scale_stays_in_bounds() {
		let (mut ctl, _) = setup();
		for _ in 0..50 {
			ctl.zoom_in();
			ctl.advance(1.0);
		}
		assert_eq!(ctl.transform().k, MAX_SCALE);
		for _ in 0..100 {
			ctl.wheel(1.0, 400.0, 300.0);
		}
		assert_eq!(ctl.transform().k, MIN_SCALE);
	}

	#[test]
	fn test_forget_missing_drag() {
		let (mut ctl, mut sim) = setup();
		while sim.tick() {}
		let key = EntityKey::node("laptop");
		let (sx, sy) = screen_pos(&ctl, &sim, &key);
		ctl.pointer_down(sx, sy, &mut sim);
		assert_eq!(ctl.dragged(), Some(&key));

		sim.set_model(&GraphModel::default());
		ctl.forget_missing(&mut sim);
		assert_eq!(ctl.gesture(), &Gesture::Idle);
		assert_eq!(sim.alpha_target(), 0.0);
	}
}
