//! Type/pattern filtering with connection cascade.
//!
//! A connection only survives when both hosts it chains between survive, so
//! a filtered model never holds half of a relationship.

use std::collections::{BTreeSet, HashSet};

use log::debug;
use regex::RegexBuilder;

use super::error::InvalidPattern;
use super::model::GraphModel;

/// User-selected constraints. An empty `types` set keeps every type; a
/// missing or empty `pattern` keeps every id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
	/// Node types to keep; empty keeps all
	pub types: BTreeSet<String>,
	/// Case-insensitive regex on node ids
	pub pattern: Option<String>,
}

impl Filter {
	/// Filter from any list of type names.
	pub fn new<I, S>(types: I, pattern: Option<&str>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			types: types.into_iter().map(Into::into).collect(),
			pattern: pattern.map(str::to_owned),
		}
	}

	/// Keeps everything.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty() && self.active_pattern().is_none()
	}

	fn active_pattern(&self) -> Option<&str> {
		self.pattern.as_deref().filter(|p| !p.is_empty())
	}

	/// Derives the filtered model. On an invalid pattern nothing is built and
	/// the caller keeps whatever model it had.
	pub fn apply(&self, model: &GraphModel) -> Result<GraphModel, InvalidPattern> {
		let regex = self
			.active_pattern()
			.map(|pattern| {
				RegexBuilder::new(pattern)
					.case_insensitive(true)
					.build()
					.map_err(|source| InvalidPattern {
						pattern: pattern.to_owned(),
						source,
					})
			})
			.transpose()?;

		let nodes: Vec<_> = model
			.nodes()
			.iter()
			.filter(|n| self.types.is_empty() || self.types.contains(&n.node_type))
			.filter(|n| regex.as_ref().is_none_or(|re| re.is_match(&n.id)))
			.cloned()
			.collect();
		let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

		let chains: Vec<_> = model
			.chains()
			.iter()
			.filter(|c| kept.contains(c.source.as_str()) && kept.contains(c.target.as_str()))
			.cloned()
			.collect();
		let live: HashSet<&str> = chains.iter().map(|c| c.connection.as_str()).collect();

		let connections: Vec<_> = model
			.connections()
			.iter()
			.filter(|c| live.contains(c.id.as_str()))
			.cloned()
			.collect();

		debug!(
			"filter {:?}: kept {}/{} nodes, {}/{} connections",
			self,
			nodes.len(),
			model.nodes().len(),
			connections.len(),
			model.connections().len()
		);
		Ok(GraphModel::from_parts(nodes, connections, chains))
	}
}
