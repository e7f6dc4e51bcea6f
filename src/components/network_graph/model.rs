//! Normalized graph model: hosts, connections and the node-connection-node
//! chains between them, with degree-derived sizes.

use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};

use super::error::MalformedTopology;
use super::types::{Chain, Connection, EntityKey, EntityKind, HostNode, Link, Topology};

/// Size of a node with no links.
pub const MIN_NODE_SIZE: f64 = 32.0;
/// Size cap for well-connected nodes.
pub const MAX_NODE_SIZE: f64 = 64.0;
/// Growth per incident link.
pub const NODE_SIZE_PER_LINK: f64 = 4.0;
/// Radius of every connection circle.
pub const CONNECTION_RADIUS: f64 = 15.0;

/// Visual size of a node with `degree` incident links, clamped to
/// `[MIN_NODE_SIZE, MAX_NODE_SIZE]`.
pub fn node_size(degree: usize) -> f64 {
	(MIN_NODE_SIZE + NODE_SIZE_PER_LINK * degree as f64).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// Hosts, connections and the chains between them. Links and degrees are
/// derived from the chains and never edited on their own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<HostNode>,
	connections: Vec<Connection>,
	chains: Vec<Chain>,
	links: Vec<Link>,
	degree: BTreeMap<EntityKey, usize>,
}

impl GraphModel {
	/// Builds a model from a raw topology. Edges that reference unknown ids
	/// are dropped and reported; duplicate ids keep their first occurrence.
	pub fn build(topology: &Topology) -> (Self, Vec<MalformedTopology>) {
		let mut issues = Vec::new();

		let mut seen = HashSet::new();
		let nodes: Vec<HostNode> = topology
			.nodes
			.iter()
			.filter(|node| {
				let fresh = seen.insert(node.id.as_str());
				if !fresh {
					issues.push(MalformedTopology::DuplicateId {
						kind: EntityKind::Node,
						id: node.id.clone(),
					});
				}
				fresh
			})
			.cloned()
			.collect();

		let mut seen = HashSet::new();
		let connections: Vec<Connection> = topology
			.connections
			.iter()
			.filter(|conn| {
				let fresh = seen.insert(conn.id.as_str());
				if !fresh {
					issues.push(MalformedTopology::DuplicateId {
						kind: EntityKind::Connection,
						id: conn.id.clone(),
					});
				}
				fresh
			})
			.cloned()
			.collect();

		let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let connection_ids: HashSet<&str> = connections.iter().map(|c| c.id.as_str()).collect();

		let mut chains = Vec::with_capacity(topology.edges.len());
		for (edge, raw) in topology.edges.iter().enumerate() {
			let before = issues.len();
			for id in [&raw.source, &raw.target] {
				if !node_ids.contains(id.as_str()) {
					issues.push(MalformedTopology::UnknownNode {
						edge,
						id: id.clone(),
					});
				}
			}
			if !connection_ids.contains(raw.connection.as_str()) {
				issues.push(MalformedTopology::UnknownConnection {
					edge,
					id: raw.connection.clone(),
				});
			}
			if issues.len() == before {
				chains.push(Chain {
					source: raw.source.clone(),
					connection: raw.connection.clone(),
					target: raw.target.clone(),
				});
			}
		}

		for issue in &issues {
			warn!("topology: {issue}");
		}

		let model = Self::from_parts(nodes, connections, chains);
		debug!(
			"built model: {} nodes, {} connections, {} links",
			model.nodes.len(),
			model.connections.len(),
			model.links.len()
		);
		(model, issues)
	}

	/// Assembles a model from already-consistent parts, deriving links and
	/// degrees from the chains.
	pub(crate) fn from_parts(
		nodes: Vec<HostNode>,
		connections: Vec<Connection>,
		chains: Vec<Chain>,
	) -> Self {
		// all sources first, then all targets, matching the drawing order
		let mut links: Vec<Link> = chains.iter().map(|c| c.links()[0].clone()).collect();
		links.extend(chains.iter().map(|c| c.links()[1].clone()));

		let mut degree: BTreeMap<EntityKey, usize> = nodes
			.iter()
			.map(|n| (EntityKey::node(&n.id), 0))
			.chain(connections.iter().map(|c| (EntityKey::connection(&c.id), 0)))
			.collect();
		for link in &links {
			*degree.entry(link.source.clone()).or_default() += 1;
			*degree.entry(link.target.clone()).or_default() += 1;
		}

		Self {
			nodes,
			connections,
			chains,
			links,
			degree,
		}
	}

	/// Hosts, in input order.
	pub fn nodes(&self) -> &[HostNode] {
		&self.nodes
	}

	/// Connections, in input order.
	pub fn connections(&self) -> &[Connection] {
		&self.connections
	}

	/// One chain per accepted edge.
	pub fn chains(&self) -> &[Chain] {
		&self.chains
	}

	/// All source-side links, then all target-side links.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Incident link count; 0 for unknown keys.
	pub fn degree(&self, key: &EntityKey) -> usize {
		self.degree.get(key).copied().unwrap_or(0)
	}

	/// Keys of every entity, nodes first.
	pub fn entity_keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
		self.nodes
			.iter()
			.map(|n| EntityKey::node(&n.id))
			.chain(self.connections.iter().map(|c| EntityKey::connection(&c.id)))
	}

	/// Host by id.
	pub fn node(&self, id: &str) -> Option<&HostNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Connection by id.
	pub fn connection(&self, id: &str) -> Option<&Connection> {
		self.connections.iter().find(|c| c.id == id)
	}

	/// Collision/hit radius of an entity: half the degree-based size for
	/// nodes, a fixed radius for connections.
	pub fn entity_radius(&self, key: &EntityKey) -> f64 {
		match key.kind {
			EntityKind::Node => node_size(self.degree(key)) / 2.0,
			EntityKind::Connection => CONNECTION_RADIUS,
		}
	}

	/// No hosts and no connections.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.connections.is_empty()
	}
}
