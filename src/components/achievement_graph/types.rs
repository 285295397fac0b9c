use serde::{Deserialize, Serialize};

/// Point in model space (or screen space, depending on context).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A single achievement in the graph.
///
/// Edges are stored on the child: `parent_node_ids` lists the nodes this one
/// depends on, in attach order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementNode {
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub item_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default)]
	pub parent_node_ids: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Position>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub glow_color: Option<String>,
}

impl AchievementNode {
	/// New node with a fresh v4 id and no parents.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: uuid::Uuid::new_v4().to_string(),
			name: name.into(),
			..Default::default()
		}
	}

	pub fn has_parent(&self, id: &str) -> bool {
		self.parent_node_ids.iter().any(|p| p == id)
	}
}

/// Editable scalar fields of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeField {
	Name,
	Description,
	ItemId,
	GlowColor,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_camel_case_and_omits_absent_fields() {
		let node = AchievementNode {
			id: "a".into(),
			name: "Node 1".into(),
			parent_node_ids: vec!["p".into()],
			glow_color: Some("#ff0000".into()),
			..Default::default()
		};
		let json = serde_json::to_value(&node).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"id": "a",
				"name": "Node 1",
				"parentNodeIds": ["p"],
				"glowColor": "#ff0000",
			})
		);
	}

	#[test]
	fn missing_parent_list_defaults_to_empty() {
		let node: AchievementNode =
			serde_json::from_str(r#"{"id":"x","name":"X","position":{"x":1.5,"y":2}}"#).unwrap();
		assert!(node.parent_node_ids.is_empty());
		assert_eq!(node.position, Some(Position::new(1.5, 2.0)));
	}

	#[test]
	fn generated_ids_are_unique() {
		assert_ne!(AchievementNode::new("a").id, AchievementNode::new("a").id);
	}
}
