use std::fmt;

use serde::{Deserialize, Serialize};

/// A host in the topology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostNode {
	/// Unique among nodes
	pub id: String,
	/// Reported OS name, picks the icon
	#[serde(default)]
	pub os: String,
	/// Role tag: `server`, `client`, `network`, ...
	#[serde(rename = "type", default)]
	pub node_type: String,
}

/// A protocol relationship between two hosts, drawn as its own entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
	/// Unique among connections
	pub id: String,
	/// e.g. `TCP`, drawn above the circle
	#[serde(default)]
	pub protocol: String,
	/// Port on the source host
	#[serde(default)]
	pub source_port: String,
	/// Port on the target host
	#[serde(default)]
	pub target_port: String,
	/// Free text
	#[serde(default)]
	pub description: String,
}

/// `source` talks to `target` through `connection`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
	/// Node id
	pub source: String,
	/// Node id
	pub target: String,
	/// Connection id
	pub connection: String,
}

/// Topology document as served by `/api/graph-data`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
	/// Hosts
	#[serde(default)]
	pub nodes: Vec<HostNode>,
	/// Protocol relationships
	#[serde(default)]
	pub connections: Vec<Connection>,
	/// Which hosts each connection joins
	#[serde(default)]
	pub edges: Vec<RawEdge>,
}

/// What a simulation entity stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
	/// A [`HostNode`]
	Node,
	/// A [`Connection`]
	Connection,
}

/// Identity of a simulation entity. Node and connection ids live in separate
/// namespaces, so the kind is part of the key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
	/// Namespace of `id`
	pub kind: EntityKind,
	/// Node or connection id
	pub id: String,
}

impl EntityKey {
	/// Key of a host node.
	pub fn node(id: impl Into<String>) -> Self {
		Self {
			kind: EntityKind::Node,
			id: id.into(),
		}
	}

	/// Key of a connection.
	pub fn connection(id: impl Into<String>) -> Self {
		Self {
			kind: EntityKind::Connection,
			id: id.into(),
		}
	}
}

impl fmt::Display for EntityKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			EntityKind::Node => write!(f, "node:{}", self.id),
			EntityKind::Connection => write!(f, "connection:{}", self.id),
		}
	}
}

/// Directed rendering edge. Always joins one node and one connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
	/// Tail of the arrow
	pub source: EntityKey,
	/// Head of the arrow
	pub target: EntityKey,
}

/// A validated `source -> connection -> target` relationship.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chain {
	/// Node id
	pub source: String,
	/// Connection id
	pub connection: String,
	/// Node id
	pub target: String,
}

impl Chain {
	/// The two links this chain contributes to the drawing.
	pub fn links(&self) -> [Link; 2] {
		[
			Link {
				source: EntityKey::node(&self.source),
				target: EntityKey::connection(&self.connection),
			},
			Link {
				source: EntityKey::connection(&self.connection),
				target: EntityKey::node(&self.target),
			},
		]
	}
}
