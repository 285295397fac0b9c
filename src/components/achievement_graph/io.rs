//! JSON import/export of the node list.

use serde_json::Value;
use thiserror::Error;

use super::model::GraphModel;
use super::types::AchievementNode;

#[derive(Debug, Error)]
pub enum ImportError {
	#[error("import failed: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("import format error: expected a list of nodes")]
	NotASequence,
	#[error("node #{index} is malformed: {source}")]
	InvalidNode {
		index: usize,
		source: serde_json::Error,
	},
	#[error("imported graph contains a circular dependency")]
	Cycle,
}

pub fn export_json(nodes: &[AchievementNode]) -> Result<String, serde_json::Error> {
	serde_json::to_string_pretty(nodes)
}

/// Parses an exported node list.
///
/// The top-level value must be an array of nodes and the parent relation must
/// be acyclic. Dangling parent ids are kept; they are skipped when drawing.
pub fn parse_import(text: &str) -> Result<Vec<AchievementNode>, ImportError> {
	let Value::Array(items) = serde_json::from_str(text)? else {
		return Err(ImportError::NotASequence);
	};
	let nodes = items
		.into_iter()
		.enumerate()
		.map(|(index, item)| {
			serde_json::from_value(item).map_err(|source| ImportError::InvalidNode { index, source })
		})
		.collect::<Result<Vec<AchievementNode>, _>>()?;

	let graph = GraphModel::new(nodes);
	if graph.has_cycle() {
		return Err(ImportError::Cycle);
	}
	Ok(graph.into_nodes())
}
