use thiserror::Error;

use super::types::EntityKind;

/// A problem found while building a model from a topology document. The
/// offending edge or entity is skipped; the rest of the build goes on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedTopology {
	/// An edge names a host that is not declared.
	#[error("edge #{edge} references unknown node `{id}`")]
	UnknownNode {
		/// Index into the topology's edge list
		edge: usize,
		/// The missing node id
		id: String,
	},

	/// An edge names a connection that is not declared.
	#[error("edge #{edge} references unknown connection `{id}`")]
	UnknownConnection {
		/// Index into the topology's edge list
		edge: usize,
		/// The missing connection id
		id: String,
	},

	/// A node or connection id appears twice; the first one is kept.
	#[error("duplicate {kind:?} id `{id}` ignored")]
	DuplicateId {
		/// Namespace of the id
		kind: EntityKind,
		/// The repeated id
		id: String,
	},
}

/// The filter pattern is not a valid regular expression.
#[derive(Clone, Debug, Error)]
#[error("invalid filter pattern `{pattern}`: {source}")]
pub struct InvalidPattern {
	/// The rejected pattern
	pub pattern: String,
	/// Why `regex` rejected it
	#[source]
	pub source: regex::Error,
}
