//! Force simulation for the node/connection layout.
//!
//! Every tick cools `alpha` toward `alpha_target`, accumulates link, charge,
//! centering and collision forces for each entity and integrates the free
//! entities with semi-implicit Euler. Pinned entities take their `fx`/`fy`
//! verbatim. Runs until `alpha` drops under `alpha_min`; re-heating restarts it.
//!
//! # Usage
//! ```ignore
//! let mut sim = ForceSimulation::new(ForceConfig::default(), 800.0, 600.0);
//! sim.set_model(&model);
//!
//! // Each frame:
//! sim.tick();
//! for entity in sim.entities() {
//!     draw(entity.key(), entity.x, entity.y);
//! }
//! ```

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use super::model::GraphModel;
use super::types::EntityKey;

/// Physics constants.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	/// Rest length of every link spring
	pub link_distance: f64,
	/// Spring stiffness
	pub link_strength: f64,
	/// Negative repels
	pub charge_strength: f64,
	/// Pull of the entity centroid toward the viewport center
	pub centering_strength: f64,
	/// Clearance added to each entity's radius for collisions
	pub collision_margin: f64,
	/// How much of an overlap is resolved per tick
	pub collision_strength: f64,
	/// Fraction of the gap between `alpha` and its target closed per tick
	pub alpha_decay: f64,
	/// Below this the simulation stops
	pub alpha_min: f64,
	/// Target held while an entity is dragged
	pub drag_alpha_target: f64,
	/// Fraction of velocity lost per tick
	pub velocity_decay: f64,
	/// Integration step
	pub dt: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			link_distance: 150.0,
			link_strength: 0.1,
			charge_strength: -800.0,
			centering_strength: 0.05,
			collision_margin: 20.0,
			collision_strength: 0.7,
			alpha_decay: 0.01,
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			velocity_decay: 0.4,
			dt: 1.0,
		}
	}
}

// spacing of the seeding spiral
const INITIAL_RADIUS: f64 = 10.0;
// squared distance floor for the charge force
const MIN_DISTANCE_SQ: f64 = 1.0;

/// One simulated node or connection.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
	key: EntityKey,
	/// Collision and hit radius
	pub radius: f64,
	/// World position
	pub x: f64,
	/// World position
	pub y: f64,
	/// Velocity
	pub vx: f64,
	/// Velocity
	pub vy: f64,
	/// Pinned x, set while dragged
	pub fx: Option<f64>,
	/// Pinned y, set while dragged
	pub fy: Option<f64>,
}

impl Entity {
	fn at(key: EntityKey, radius: f64, x: f64, y: f64) -> Self {
		Self {
			key,
			radius,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Identity of the entity.
	pub fn key(&self) -> &EntityKey {
		&self.key
	}

	/// Held in place by a drag.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() && self.fy.is_some()
	}

	fn contains(&self, x: f64, y: f64) -> bool {
		let (dx, dy) = (self.x - x, self.y - y);
		dx * dx + dy * dy <= self.radius * self.radius
	}
}

/// Position of the `i`th point of a sunflower spiral around `(cx, cy)`.
fn phyllotaxis(i: usize, cx: f64, cy: f64) -> (f64, f64) {
	let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
	let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	(cx + r * angle.cos(), cy + r * angle.sin())
}

/// Tiny deterministic offset separating coincident entities.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let angle = ((i * 7919 + j * 104_729) % 360) as f64 * PI / 180.0;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

/// Layout state for every entity of the current model.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
	entities: Vec<Entity>,
	index: HashMap<EntityKey, usize>,
	links: Vec<(usize, usize)>,
	/// Last known position of every entity ever laid out
	position_cache: HashMap<EntityKey, (f64, f64)>,
	/// Constants; may be tuned between ticks
	pub config: ForceConfig,
	alpha: f64,
	alpha_target: f64,
	center: (f64, f64),
}

impl ForceSimulation {
	/// Empty simulation centered on a `width` x `height` viewport.
	pub fn new(config: ForceConfig, width: f64, height: f64) -> Self {
		Self {
			entities: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			position_cache: HashMap::new(),
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			center: (width / 2.0, height / 2.0),
		}
	}

	// =========================================================================
	// MODEL
	// =========================================================================

	/// Replaces the entity set with the model's. Surviving entities keep their
	/// state, returning ones get their cached position back and only new ones
	/// are seeded. Returns whether the identity set changed, in which case the
	/// simulation is re-heated.
	pub fn set_model(&mut self, model: &GraphModel) -> bool {
		for e in &self.entities {
			self.position_cache.insert(e.key.clone(), (e.x, e.y));
		}
		let previous: HashMap<EntityKey, Entity> = self
			.entities
			.drain(..)
			.map(|e| (e.key.clone(), e))
			.collect();

		let mut placed = Vec::new();
		for key in model.entity_keys() {
			let radius = model.entity_radius(&key);
			let (entity, known) = match previous.get(&key) {
				Some(old) => (
					Entity {
						radius,
						..old.clone()
					},
					true,
				),
				None => match self.position_cache.get(&key) {
					Some(&(x, y)) => (Entity::at(key, radius, x, y), true),
					None => (Entity::at(key, radius, 0.0, 0.0), false),
				},
			};
			self.entities.push(entity);
			placed.push(known);
		}

		self.index = self
			.entities
			.iter()
			.enumerate()
			.map(|(i, e)| (e.key.clone(), i))
			.collect();
		self.links = model
			.links()
			.iter()
			.filter_map(|l| Some((*self.index.get(&l.source)?, *self.index.get(&l.target)?)))
			.collect();

		self.seed(&mut placed);

		let changed = previous.len() != self.entities.len()
			|| self.entities.iter().any(|e| !previous.contains_key(&e.key));
		if changed {
			debug!("entity set changed ({} entities), re-heating", self.entities.len());
			self.reheat();
		}
		changed
	}

	/// Places unplaced entities around the centroid of their placed
	/// neighbours, growing outward from what is already laid out. An entity
	/// with no placed neighbour starts a new cluster around the center.
	fn seed(&mut self, placed: &mut [bool]) {
		let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); self.entities.len()];
		for &(s, t) in &self.links {
			neighbours[s].push(t);
			neighbours[t].push(s);
		}

		// spiral step per anchor set, so each seed lands close to its anchors
		let mut steps: HashMap<Vec<usize>, usize> = HashMap::new();
		let mut pending: Vec<usize> = (0..placed.len()).filter(|&i| !placed[i]).collect();
		while !pending.is_empty() {
			let mut batch: Vec<usize> = pending
				.iter()
				.copied()
				.filter(|&i| neighbours[i].iter().any(|&n| placed[n]))
				.collect();
			if batch.is_empty() {
				batch.push(pending[0]);
			}

			for &i in &batch {
				let anchors: Vec<usize> = neighbours[i].iter().copied().filter(|&n| placed[n]).collect();
				let (cx, cy) = if anchors.is_empty() {
					self.center
				} else {
					let n = anchors.len() as f64;
					(
						anchors.iter().map(|&a| self.entities[a].x).sum::<f64>() / n,
						anchors.iter().map(|&a| self.entities[a].y).sum::<f64>() / n,
					)
				};
				let step = steps.entry(anchors).or_default();
				let (x, y) = phyllotaxis(*step, cx, cy);
				*step += 1;
				self.entities[i].x = x;
				self.entities[i].y = y;
				placed[i] = true;
			}
			pending.retain(|i| !batch.contains(i));
		}
	}

	/// All entities, hosts first.
	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	/// Entity by key.
	pub fn entity(&self, key: &EntityKey) -> Option<&Entity> {
		self.index.get(key).map(|&i| &self.entities[i])
	}

	fn entity_mut(&mut self, key: &EntityKey) -> Option<&mut Entity> {
		self.index.get(key).copied().map(|i| &mut self.entities[i])
	}

	/// Whether the key is part of the current model.
	pub fn contains(&self, key: &EntityKey) -> bool {
		self.index.contains_key(key)
	}

	/// Link endpoints as `(source, target)` entity pairs.
	pub fn link_endpoints(&self) -> impl Iterator<Item = (&Entity, &Entity)> + '_ {
		self.links
			.iter()
			.map(|&(s, t)| (&self.entities[s], &self.entities[t]))
	}

	/// Topmost entity under a world-space point. Later entities are drawn on
	/// top, so the search runs back to front.
	pub fn entity_at(&self, x: f64, y: f64) -> Option<&EntityKey> {
		self.entities
			.iter()
			.rev()
			.find(|e| e.contains(x, y))
			.map(|e| &e.key)
	}

	// =========================================================================
	// ENERGY
	// =========================================================================

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy `alpha` decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Clamped to `[0, 1]`.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// Full energy, restarting a cooled layout.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
	}

	/// False once the layout has cooled and nothing holds it hot.
	pub fn is_running(&self) -> bool {
		self.alpha >= self.config.alpha_min || self.alpha_target >= self.config.alpha_min
	}

	/// Point the centering force pulls toward.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Re-centers on the new viewport and re-heats.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = (width / 2.0, height / 2.0);
		self.reheat();
	}

	// =========================================================================
	// PINNING (for drag)
	// =========================================================================

	/// Fixes an entity at a world point. False for unknown keys.
	pub fn pin(&mut self, key: &EntityKey, x: f64, y: f64) -> bool {
		match self.entity_mut(key) {
			Some(entity) => {
				entity.fx = Some(x);
				entity.fy = Some(y);
				true
			}
			None => false,
		}
	}

	/// Releases a pin. Velocity is left as it was.
	pub fn unpin(&mut self, key: &EntityKey) {
		if let Some(entity) = self.entity_mut(key) {
			entity.fx = None;
			entity.fy = None;
		}
	}

	// =========================================================================
	// SIMULATION
	// =========================================================================

	/// Advances one step. Returns false without touching anything when the
	/// simulation has cooled down.
	pub fn tick(&mut self) -> bool {
		if !self.is_running() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		let forces = self.calculate_forces();
		let (alpha, dt) = (self.alpha, self.config.dt);
		let keep = 1.0 - self.config.velocity_decay;

		for (entity, (fx, fy)) in self.entities.iter_mut().zip(forces) {
			if let (Some(px), Some(py)) = (entity.fx, entity.fy) {
				entity.x = px;
				entity.y = py;
				continue;
			}
			entity.vx = (entity.vx + fx * alpha * dt) * keep;
			entity.vy = (entity.vy + fy * alpha * dt) * keep;
			entity.x += entity.vx * dt;
			entity.y += entity.vy * dt;
		}
		true
	}

	fn calculate_forces(&self) -> Vec<(f64, f64)> {
		let n = self.entities.len();
		let mut forces = vec![(0.0, 0.0); n];
		if n == 0 {
			return forces;
		}
		let cfg = &self.config;
		let delta = |i: usize, j: usize| {
			let (a, b) = (&self.entities[i], &self.entities[j]);
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			if dx == 0.0 && dy == 0.0 {
				jiggle(i, j)
			} else {
				(dx, dy)
			}
		};

		// Springs toward the rest length
		for &(s, t) in &self.links {
			if s == t {
				continue;
			}
			let (dx, dy) = delta(s, t);
			let dist = (dx * dx + dy * dy).sqrt();
			let f = cfg.link_strength * (dist - cfg.link_distance) / dist;
			forces[s].0 += dx * f;
			forces[s].1 += dy * f;
			forces[t].0 -= dx * f;
			forces[t].1 -= dy * f;
		}

		// Pairwise charge and collision
		for i in 0..n {
			for j in (i + 1)..n {
				let (dx, dy) = delta(i, j);
				let dist_sq = dx * dx + dy * dy;
				let dist = dist_sq.sqrt();

				// magnitude strength / d², along the unit vector
				let f = cfg.charge_strength / (dist_sq.max(MIN_DISTANCE_SQ) * dist);
				forces[i].0 += dx * f;
				forces[i].1 += dy * f;
				forces[j].0 -= dx * f;
				forces[j].1 -= dy * f;

				let reach = self.entities[i].radius
					+ self.entities[j].radius
					+ 2.0 * cfg.collision_margin;
				if dist < reach {
					let push = (reach - dist) / dist * cfg.collision_strength * 0.5;
					forces[i].0 -= dx * push;
					forces[i].1 -= dy * push;
					forces[j].0 += dx * push;
					forces[j].1 += dy * push;
				}
			}
		}

		// Centroid toward the viewport center
		let count = n as f64;
		let (sx, sy) = self
			.entities
			.iter()
			.fold((0.0, 0.0), |(sx, sy), e| (sx + e.x, sy + e.y));
		let pull = (
			(self.center.0 - sx / count) * cfg.centering_strength,
			(self.center.1 - sy / count) * cfg.centering_strength,
		);
		for force in &mut forces {
			force.0 += pull.0;
			force.1 += pull.1;
		}

		forces
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::filter::Filter;
	use crate::components::network_graph::types::{Connection, HostNode, RawEdge, Topology};

	fn topology(pairs: &[(&str, &str)]) -> Topology {
		let mut nodes: Vec<HostNode> = Vec::new();
		let mut connections = Vec::new();
		let mut edges = Vec::new();
		for (i, (s, t)) in pairs.iter().enumerate() {
			for id in [s, t] {
				if !nodes.iter().any(|n| n.id == *id) {
					nodes.push(HostNode {
						id: id.to_string(),
						os: "Linux".into(),
						node_type: if id.starts_with('S') { "server" } else { "client" }.into(),
					});
				}
			}
			let id = format!("C{i}");
			connections.push(Connection {
				id: id.clone(),
				protocol: "TCP".into(),
				source_port: "1".into(),
				target_port: "2".into(),
				description: String::new(),
			});
			edges.push(RawEdge {
				source: s.to_string(),
				target: t.to_string(),
				connection: id,
			});
		}
		Topology {
			nodes,
			connections,
			edges,
		}
	}

	fn simulation(pairs: &[(&str, &str)]) -> (ForceSimulation, GraphModel) {
		let (model, _) = GraphModel::build(&topology(pairs));
		let mut sim = ForceSimulation::new(ForceConfig::default(), 800.0, 600.0);
		sim.set_model(&model);
		(sim, model)
	}

	fn distance(sim: &ForceSimulation, a: &EntityKey, b: &EntityKey) -> f64 {
		let (a, b) = (sim.entity(a).unwrap(), sim.entity(b).unwrap());
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn test_alpha_decays_geometrically() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		assert_eq!(sim.alpha(), 1.0);
		sim.tick();
		assert!((sim.alpha() - 0.99).abs() < 1e-12);
		sim.tick();
		assert!((sim.alpha() - 0.9801).abs() < 1e-12);
	}

	#[test]
	fn test_simulation_stops_when_cold() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 10_000);
		}
		assert!(sim.alpha() < sim.config.alpha_min);
		let before = sim.entities().to_vec();
		assert!(!sim.tick());
		assert_eq!(sim.entities(), &before[..]);

		sim.reheat();
		assert!(sim.tick());
	}

	#[test]
	fn test_alpha_target_holds_simulation_hot() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		sim.set_alpha_target(0.3);
		for _ in 0..2000 {
			assert!(sim.tick());
		}
		assert!((sim.alpha() - 0.3).abs() < 1e-3);

		sim.set_alpha_target(0.0);
		for _ in 0..2000 {
			sim.tick();
		}
		assert!(!sim.is_running());
	}

	#[test]
	fn test_link_pulls_far_entities_together() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		let (a, c) = (EntityKey::node("A"), EntityKey::connection("C0"));
		sim.entity_mut(&a).unwrap().x = -2000.0;
		let initial = distance(&sim, &a, &c);

		for _ in 0..300 {
			sim.tick();
		}
		assert!(distance(&sim, &a, &c) < initial);
	}

	#[test]
	fn test_unlinked_entities_repel() {
		let (mut sim, _) = simulation(&[("S1", "A"), ("S2", "B")]);
		let (a, b) = (EntityKey::node("A"), EntityKey::node("B"));
		sim.entity_mut(&a).unwrap().x = 400.0;
		sim.entity_mut(&a).unwrap().y = 300.0;
		sim.entity_mut(&b).unwrap().x = 410.0;
		sim.entity_mut(&b).unwrap().y = 300.0;

		for _ in 0..100 {
			sim.tick();
		}
		assert!(distance(&sim, &a, &b) > 10.0);
	}

	#[test]
	fn test_charge_falls_off_with_distance_squared() {
		let host = |id: &str| HostNode {
			id: id.into(),
			os: "Linux".into(),
			node_type: "server".into(),
		};
		let (model, _) = GraphModel::build(&Topology {
			nodes: vec![host("P"), host("Q")],
			..Topology::default()
		});
		let config = ForceConfig {
			link_strength: 0.0,
			centering_strength: 0.0,
			collision_strength: 0.0,
			..ForceConfig::default()
		};
		let mut sim = ForceSimulation::new(config, 800.0, 600.0);
		sim.set_model(&model);

		let mut magnitude_at = |d: f64| {
			sim.entities[0].x = 0.0;
			sim.entities[0].y = 0.0;
			sim.entities[1].x = d;
			sim.entities[1].y = 0.0;
			let forces = sim.calculate_forces();
			assert!(forces[0].0 < 0.0 && forces[1].0 > 0.0);
			forces[0].0.hypot(forces[0].1)
		};
		let (near, far) = (magnitude_at(10.0), magnitude_at(20.0));
		assert!((near - 8.0).abs() < 1e-9);
		assert!((near / far - 4.0).abs() < 1e-9);
	}

	#[test]
	fn test_collision_separates_coincident_entities() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		for e in &mut sim.entities {
			e.x = 400.0;
			e.y = 300.0;
		}
		for _ in 0..300 {
			sim.tick();
		}
		let keys: Vec<_> = sim.entities().iter().map(|e| e.key().clone()).collect();
		for i in 0..keys.len() {
			for j in (i + 1)..keys.len() {
				assert!(distance(&sim, &keys[i], &keys[j]) > 1.0);
			}
		}
		assert!(sim.entities().iter().all(|e| e.x.is_finite() && e.y.is_finite()));
	}

	#[test]
	fn test_centroid_drifts_to_center() {
		let (mut sim, _) = simulation(&[("S1", "A"), ("S2", "B")]);
		for e in &mut sim.entities {
			e.x += 1000.0;
		}
		for _ in 0..600 {
			sim.tick();
		}
		let n = sim.entities().len() as f64;
		let cx = sim.entities().iter().map(|e| e.x).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 50.0);
	}

	#[test]
	fn test_pinned_entity_follows_pin() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		let key = EntityKey::node("S1");
		assert!(sim.pin(&key, 123.0, 456.0));
		sim.tick();
		let e = sim.entity(&key).unwrap();
		assert_eq!((e.x, e.y), (123.0, 456.0));

		sim.unpin(&key);
		assert!(!sim.entity(&key).unwrap().is_pinned());
		assert!(!sim.pin(&EntityKey::node("missing"), 0.0, 0.0));
	}

	#[test]
	fn test_unpin_keeps_velocity() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		let key = EntityKey::node("A");
		sim.tick();
		let before = sim.entity(&key).map(|e| (e.vx, e.vy)).unwrap();
		sim.pin(&key, 0.0, 0.0);
		sim.unpin(&key);
		assert_eq!(sim.entity(&key).map(|e| (e.vx, e.vy)).unwrap(), before);
	}

	#[test]
	fn test_runs_are_deterministic() {
		let pairs = [("S1", "A"), ("S1", "B"), ("S2", "B"), ("S2", "C")];
		let (mut first, _) = simulation(&pairs);
		let (mut second, _) = simulation(&pairs);
		for _ in 0..250 {
			first.tick();
			second.tick();
		}
		assert_eq!(first.entities(), second.entities());
	}

	#[test]
	fn test_set_model_carries_positions() {
		let (mut sim, model) = simulation(&[("S1", "A"), ("S2", "B")]);
		for _ in 0..50 {
			sim.tick();
		}
		let s1 = sim.entity(&EntityKey::node("S1")).unwrap().clone();
		let b = sim.entity(&EntityKey::node("B")).unwrap().clone();

		let narrowed = Filter::new(Vec::<String>::new(), Some("^(S1|A)$"))
			.apply(&model)
			.unwrap();
		assert!(sim.set_model(&narrowed));
		assert_eq!(sim.alpha(), 1.0);
		assert_eq!(sim.entity(&EntityKey::node("S1")).unwrap().x, s1.x);
		assert!(!sim.contains(&EntityKey::node("B")));

		sim.set_model(&model);
		let restored = sim.entity(&EntityKey::node("B")).unwrap();
		assert_eq!((restored.x, restored.y), (b.x, b.y));
	}

	#[test]
	fn test_same_identity_does_not_reheat() {
		let (mut sim, model) = simulation(&[("S1", "A")]);
		for _ in 0..10 {
			sim.tick();
		}
		let alpha = sim.alpha();
		assert!(!sim.set_model(&model));
		assert_eq!(sim.alpha(), alpha);
	}

	#[test]
	fn test_new_entities_seeded_near_neighbours() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		for _ in 0..100 {
			sim.tick();
		}
		let wide = GraphModel::build(&topology(&[("S1", "A"), ("S1", "Z")])).0;
		let s1 = sim.entity(&EntityKey::node("S1")).unwrap().clone();
		sim.set_model(&wide);

		// C1 is anchored on S1 alone, Z then on C1
		let c1 = sim.entity(&EntityKey::connection("C1")).unwrap().clone();
		assert!(((c1.x - s1.x).powi(2) + (c1.y - s1.y).powi(2)).sqrt() < 50.0);
		assert_ne!((c1.x, c1.y), (s1.x, s1.y));
		let z = sim.entity(&EntityKey::node("Z")).unwrap();
		assert!(((z.x - c1.x).powi(2) + (z.y - c1.y).powi(2)).sqrt() < 50.0);
	}

	#[test]
	fn test_new_entity_in_large_graph_seeded_beside_anchor() {
		let names: Vec<String> = (0..40).map(|i| format!("X{i}")).collect();
		let mut pairs: Vec<(&str, &str)> = names.iter().map(|x| ("S1", x.as_str())).collect();
		let (mut sim, _) = simulation(&pairs);
		for _ in 0..100 {
			sim.tick();
		}
		let hub = sim.entity(&EntityKey::node("S1")).unwrap().clone();

		pairs.push(("S1", "Znew"));
		let wide = GraphModel::build(&topology(&pairs)).0;
		sim.set_model(&wide);

		let added = sim.entity(&EntityKey::connection("C40")).unwrap().clone();
		assert!(sim.entities().len() > 80);
		assert!(((added.x - hub.x).powi(2) + (added.y - hub.y).powi(2)).sqrt() < 15.0);
		let z = sim.entity(&EntityKey::node("Znew")).unwrap();
		assert!(((z.x - added.x).powi(2) + (z.y - added.y).powi(2)).sqrt() < 15.0);
	}

	#[test]
	fn test_resize_recenters_and_reheats() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		for _ in 0..100 {
			sim.tick();
		}
		sim.resize(1000.0, 400.0);
		assert_eq!(sim.center(), (500.0, 200.0));
		assert_eq!(sim.alpha(), 1.0);
	}

	#[test]
	fn test_entity_at_prefers_topmost() {
		let (mut sim, _) = simulation(&[("S1", "A")]);
		for e in &mut sim.entities {
			e.x = 0.0;
			e.y = 0.0;
		}
		assert_eq!(sim.entity_at(1.0, 1.0), Some(&EntityKey::connection("C0")));
		assert_eq!(sim.entity_at(500.0, 500.0), None);
	}
}
