use std::collections::HashSet;

use thiserror::Error;

use super::types::{AchievementNode, NodeField, Position};
use super::viewport::{fallback_position, node_position};

/// Distance between a parent and a freshly created child, in model units.
pub const CHILD_RADIUS: f64 = 150.0;
/// Angular step between consecutive children of one parent.
pub const CHILD_ANGLE_STEP_DEG: f64 = 60.0;
const CHILD_SLOTS: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
	#[error("node `{0}` does not exist")]
	UnknownNode(String),
	#[error("a node cannot be its own parent")]
	SelfParent,
	#[error("cannot attach this parent: it would create a circular dependency")]
	WouldCycle,
	#[error("this node already depends on that parent through another path")]
	AlreadyAncestor,
	#[error("name must not be empty")]
	EmptyName,
}

/// Outcome of a successful [`GraphModel::toggle_parent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentToggle {
	Attached,
	Detached,
}

/// Ordered node list plus the operations that keep the parent relation acyclic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<AchievementNode>,
}

impl GraphModel {
	pub fn new(nodes: Vec<AchievementNode>) -> Self {
		Self { nodes }
	}

	pub fn nodes(&self) -> &[AchievementNode] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn get(&self, id: &str) -> Option<&AchievementNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	fn get_mut(&mut self, id: &str) -> Result<&mut AchievementNode, GraphError> {
		self.nodes
			.iter_mut()
			.find(|n| n.id == id)
			.ok_or_else(|| GraphError::UnknownNode(id.to_string()))
	}

	/// Explicit position, or the grid fallback for the node's list index.
	pub fn position_of(&self, id: &str) -> Option<Position> {
		self.nodes
			.iter()
			.position(|n| n.id == id)
			.map(|idx| node_position(&self.nodes[idx], idx))
	}

	pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a AchievementNode> {
		self.nodes.iter().filter(move |n| n.has_parent(id))
	}

	/// Appends a parentless node on the next grid slot and returns its id.
	pub fn create_root_node(&mut self) -> String {
		let mut node = AchievementNode::new(format!("Node {}", self.nodes.len() + 1));
		node.position = Some(fallback_position(self.nodes.len()));
		let id = node.id.clone();
		log::debug!("created root node {id}");
		self.nodes.push(node);
		id
	}

	/// Appends a child of `parent_id`, fanned out around the parent in 60° steps.
	pub fn create_child_node(&mut self, parent_id: &str) -> Result<String, GraphError> {
		let origin = self
			.position_of(parent_id)
			.ok_or_else(|| GraphError::UnknownNode(parent_id.to_string()))?;
		let siblings = self.children_of(parent_id).count();

		let mut node = AchievementNode::new(format!("Child {}", self.nodes.len() + 1));
		node.parent_node_ids = vec![parent_id.to_string()];
		node.position = Some(child_position(origin, siblings));
		let id = node.id.clone();
		log::debug!("created child node {id} of {parent_id} (slot {siblings})");
		self.nodes.push(node);
		Ok(id)
	}

	/// Removes a node and strips it from every remaining parent list.
	pub fn delete_node(&mut self, id: &str) -> Result<AchievementNode, GraphError> {
		let idx = self
			.nodes
			.iter()
			.position(|n| n.id == id)
			.ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
		let removed = self.nodes.remove(idx);
		for node in &mut self.nodes {
			node.parent_node_ids.retain(|p| p != id);
		}
		log::debug!("deleted node {id}");
		Ok(removed)
	}

	/// Detaches `parent_id` if it is a direct parent, otherwise attaches it.
	///
	/// Attaching is refused when `parent_id` is a descendant of `child_id`
	/// (cycle) or already reachable through other parents (redundant edge).
	pub fn toggle_parent(
		&mut self,
		child_id: &str,
		parent_id: &str,
	) -> Result<ParentToggle, GraphError> {
		if child_id == parent_id {
			return Err(GraphError::SelfParent);
		}
		if self.get(parent_id).is_none() {
			return Err(GraphError::UnknownNode(parent_id.to_string()));
		}
		let child = self
			.get(child_id)
			.ok_or_else(|| GraphError::UnknownNode(child_id.to_string()))?;

		if child.has_parent(parent_id) {
			self.get_mut(child_id)?.parent_node_ids.retain(|p| p != parent_id);
			log::debug!("detached {parent_id} from {child_id}");
			return Ok(ParentToggle::Detached);
		}
		if self.is_ancestor(child_id, parent_id) {
			return Err(GraphError::WouldCycle);
		}
		if self.is_ancestor(parent_id, child_id) {
			return Err(GraphError::AlreadyAncestor);
		}

		self.get_mut(child_id)?.parent_node_ids.push(parent_id.to_string());
		log::debug!("attached {parent_id} to {child_id}");
		Ok(ParentToggle::Attached)
	}

	/// True if `candidate` is reachable from `node_id` by following parent edges.
	pub fn is_ancestor(&self, candidate: &str, node_id: &str) -> bool {
		let Some(start) = self.get(node_id) else {
			return false;
		};
		let mut stack: Vec<&str> = start.parent_node_ids.iter().map(String::as_str).collect();
		let mut visited = HashSet::new();
		while let Some(id) = stack.pop() {
			if id == candidate {
				return true;
			}
			if !visited.insert(id) {
				continue;
			}
			if let Some(node) = self.get(id) {
				stack.extend(node.parent_node_ids.iter().map(String::as_str));
			}
		}
		false
	}

	/// Nodes that may be offered as parents of `child_id`: everything except
	/// the node itself, its descendants and its indirect ancestors. Direct
	/// parents stay listed so they can be detached.
	pub fn available_parents<'a>(&'a self, child_id: &'a str) -> Vec<&'a AchievementNode> {
		let Some(child) = self.get(child_id) else {
			return Vec::new();
		};
		self.nodes
			.iter()
			.filter(|n| n.id != child_id && !self.is_ancestor(child_id, &n.id))
			.filter(|n| child.has_parent(&n.id) || !self.is_ancestor(&n.id, child_id))
			.collect()
	}

	/// Sets one scalar field. Empty values clear optional fields.
	pub fn set_node_field(
		&mut self,
		id: &str,
		field: NodeField,
		value: &str,
	) -> Result<(), GraphError> {
		let trimmed = value.trim();
		let blank = trimmed.is_empty();
		let node = self.get_mut(id)?;
		match field {
			NodeField::Name => {
				if blank {
					return Err(GraphError::EmptyName);
				}
				node.name = trimmed.to_string();
			}
			// free text keeps its whitespace
			NodeField::Description => node.description = (!blank).then(|| value.to_string()),
			NodeField::ItemId => node.item_id = (!blank).then(|| trimmed.to_string()),
			NodeField::GlowColor => node.glow_color = (!blank).then(|| trimmed.to_string()),
		}
		Ok(())
	}

	pub fn set_position(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
		self.get_mut(id)?.position = Some(position);
		Ok(())
	}

	/// Replaces the whole node list verbatim.
	pub fn replace_all(&mut self, nodes: Vec<AchievementNode>) {
		self.nodes = nodes;
	}

	pub fn export_all(&self) -> Vec<AchievementNode> {
		self.nodes.clone()
	}

	pub fn into_nodes(self) -> Vec<AchievementNode> {
		self.nodes
	}

	/// True if any node is its own ancestor.
	pub fn has_cycle(&self) -> bool {
		self.nodes.iter().any(|n| self.is_ancestor(&n.id, &n.id))
	}
}

/// Position of the `slot`-th child around `origin`.
pub fn child_position(origin: Position, slot: usize) -> Position {
	let angle = ((slot % CHILD_SLOTS) as f64 * CHILD_ANGLE_STEP_DEG).to_radians();
	Position::new(
		origin.x + angle.cos() * CHILD_RADIUS,
		origin.y + angle.sin() * CHILD_RADIUS,
	)
}

#[cfg(test)]
mod tests {
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	use super::*;

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-6
	}

	fn node(id: &str, parents: &[&str]) -> AchievementNode {
		AchievementNode {
			id: id.into(),
			name: id.to_uppercase(),
			parent_node_ids: parents.iter().map(|p| p.to_string()).collect(),
			..Default::default()
		}
	}

	#[test]
	fn root_nodes_fill_the_grid() {
		let mut graph = GraphModel::default();
		for _ in 0..4 {
			graph.create_root_node();
		}
		let positions: Vec<_> = graph.nodes().iter().map(|n| n.position.unwrap()).collect();
		assert_eq!(positions[0], Position::new(100.0, 100.0));
		assert_eq!(positions[2], Position::new(400.0, 100.0));
		assert_eq!(positions[3], Position::new(100.0, 250.0));
		assert_eq!(graph.nodes()[3].name, "Node 4");
		assert!(graph.nodes().iter().all(|n| n.parent_node_ids.is_empty()));
	}

	#[test]
	fn children_fan_out_in_sixty_degree_steps() {
		let mut graph = GraphModel::default();
		let root = graph.create_root_node();
		let r = graph.position_of(&root).unwrap();

		let c1 = graph.create_child_node(&root).unwrap();
		let p1 = graph.position_of(&c1).unwrap();
		assert!(approx(p1.x, r.x + 150.0) && approx(p1.y, r.y));

		let c2 = graph.create_child_node(&root).unwrap();
		let p2 = graph.position_of(&c2).unwrap();
		assert!(approx(p2.x, r.x + 75.0));
		assert!((p2.y - (r.y + 129.9)).abs() < 0.01);
		assert_eq!(graph.get(&c2).unwrap().parent_node_ids, vec![root.clone()]);
	}

	#[test]
	fn seventh_child_wraps_to_first_slot() {
		let mut graph = GraphModel::default();
		let root = graph.create_root_node();
		let ids: Vec<_> = (0..7).map(|_| graph.create_child_node(&root).unwrap()).collect();
		let first = graph.position_of(&ids[0]).unwrap();
		let seventh = graph.position_of(&ids[6]).unwrap();
		assert!(approx(first.x, seventh.x) && approx(first.y, seventh.y));
	}

	#[test]
	fn child_of_unpositioned_parent_uses_grid_fallback() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &[])]);
		let c = graph.create_child_node("b").unwrap();
		let pos = graph.position_of(&c).unwrap();
		assert!(approx(pos.x, 250.0 + 150.0) && approx(pos.y, 100.0));
	}

	#[test]
	fn child_of_missing_parent_is_rejected() {
		let mut graph = GraphModel::default();
		assert_eq!(
			graph.create_child_node("nope"),
			Err(GraphError::UnknownNode("nope".into()))
		);
		assert!(graph.is_empty());
	}

	#[test]
	fn delete_mid_chain_severs_references() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &["a"]), node("c", &["b"])]);
		graph.delete_node("b").unwrap();
		assert_eq!(graph.len(), 2);
		assert!(graph.get("b").is_none());
		assert!(graph.get("c").unwrap().parent_node_ids.is_empty());
		assert_eq!(graph.get("a").unwrap(), &node("a", &[]));
		assert!(graph.nodes().iter().all(|n| !n.has_parent("b")));
	}

	#[test]
	fn delete_keeps_other_parents() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &[]), node("c", &["a", "b"])]);
		graph.delete_node("a").unwrap();
		assert_eq!(graph.get("c").unwrap().parent_node_ids, vec!["b".to_string()]);
	}

	#[test]
	fn toggling_a_descendant_as_parent_is_a_cycle() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &["a"])]);
		assert_eq!(graph.toggle_parent("a", "b"), Err(GraphError::WouldCycle));
		assert!(graph.get("a").unwrap().parent_node_ids.is_empty());
	}

	#[test]
	fn attaching_a_transitive_ancestor_is_rejected() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &["a"]), node("c", &["b"])]);
		assert_eq!(graph.toggle_parent("c", "a"), Err(GraphError::AlreadyAncestor));
		assert_eq!(graph.get("c").unwrap().parent_node_ids, vec!["b".to_string()]);
	}

	// Rejection only covers transitive ancestors; a direct parent is detached.
	#[test]
	fn toggle_attaches_then_detaches() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &[])]);
		assert_eq!(graph.toggle_parent("b", "a"), Ok(ParentToggle::Attached));
		assert_eq!(graph.get("b").unwrap().parent_node_ids, vec!["a".to_string()]);
		assert_eq!(graph.toggle_parent("b", "a"), Ok(ParentToggle::Detached));
		assert!(graph.get("b").unwrap().parent_node_ids.is_empty());
	}

	#[test]
	fn toggle_guards_self_and_unknown() {
		let mut graph = GraphModel::new(vec![node("a", &[])]);
		assert_eq!(graph.toggle_parent("a", "a"), Err(GraphError::SelfParent));
		assert_eq!(
			graph.toggle_parent("a", "zz"),
			Err(GraphError::UnknownNode("zz".into()))
		);
	}

	#[test]
	fn multiple_parents_are_allowed() {
		let mut graph = GraphModel::new(vec![node("a", &[]), node("b", &[]), node("c", &[])]);
		graph.toggle_parent("c", "a").unwrap();
		graph.toggle_parent("c", "b").unwrap();
		assert_eq!(graph.get("c").unwrap().parent_node_ids, vec!["a", "b"]);
		assert_eq!(graph.children_of("a").count(), 1);
	}

	#[test]
	fn available_parents_excludes_self_and_descendants() {
		let graph = GraphModel::new(vec![
			node("a", &[]),
			node("b", &["a"]),
			node("c", &["b"]),
			node("d", &[]),
		]);
		let ids: Vec<_> = graph.available_parents("b").iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "d"]);
	}

	#[test]
	fn available_parents_hides_indirect_ancestors() {
		let graph = GraphModel::new(vec![
			node("a", &[]),
			node("b", &["a"]),
			node("c", &["b"]),
			node("d", &[]),
		]);
		let ids: Vec<_> = graph.available_parents("c").iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["b", "d"]);
		for id in ids {
			let mut attempt = graph.clone();
			assert!(attempt.toggle_parent("c", id).is_ok());
		}
		assert!(graph.available_parents("missing").is_empty());
	}

	#[test]
	fn description_keeps_surrounding_whitespace() {
		let mut graph = GraphModel::new(vec![node("a", &[])]);
		graph.set_node_field("a", NodeField::Description, "  mine ten ores\n").unwrap();
		graph.set_node_field("a", NodeField::Name, "  Miner ").unwrap();
		let a = graph.get("a").unwrap();
		assert_eq!(a.description.as_deref(), Some("  mine ten ores\n"));
		assert_eq!(a.name, "Miner");
		graph.set_node_field("a", NodeField::Description, " \t ").unwrap();
		assert_eq!(graph.get("a").unwrap().description, None);
	}

	#[test]
	fn ancestor_walk_terminates_on_cyclic_input() {
		let graph = GraphModel::new(vec![node("a", &["b"]), node("b", &["a"]), node("c", &[])]);
		assert!(graph.is_ancestor("a", "a"));
		assert!(!graph.is_ancestor("c", "a"));
		assert!(graph.has_cycle());
	}

	#[test]
	fn set_field_rules() {
		let mut graph = GraphModel::new(vec![node("a", &[])]);
		assert_eq!(graph.set_node_field("a", NodeField::Name, "  "), Err(GraphError::EmptyName));
		graph.set_node_field("a", NodeField::Name, "Stone Age").unwrap();
		graph.set_node_field("a", NodeField::GlowColor, "#00ff00").unwrap();
		graph.set_node_field("a", NodeField::Description, "first").unwrap();
		graph.set_node_field("a", NodeField::Description, "").unwrap();
		let a = graph.get("a").unwrap();
		assert_eq!(a.name, "Stone Age");
		assert_eq!(a.glow_color.as_deref(), Some("#00ff00"));
		assert_eq!(a.description, None);
	}

	#[test]
	fn replace_all_of_export_is_identity() {
		let mut graph = GraphModel::default();
		let root = graph.create_root_node();
		let child = graph.create_child_node(&root).unwrap();
		graph.set_node_field(&child, NodeField::ItemId, "iron_ingot").unwrap();
		let before = graph.clone();
		let exported = graph.export_all();
		graph.replace_all(exported);
		assert_eq!(graph, before);
	}

	#[test]
	fn replace_all_is_verbatim() {
		let mut graph = GraphModel::default();
		graph.replace_all(vec![node("a", &["b"]), node("b", &["a"]), node("c", &["gone"])]);
		assert_eq!(graph.len(), 3);
		assert_eq!(graph.get("c").unwrap().parent_node_ids, vec!["gone".to_string()]);
	}

	#[test]
	fn random_attach_sequences_stay_acyclic() {
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..50 {
			let ids: Vec<String> = (0..12).map(|i| format!("n{i}")).collect();
			let mut graph = GraphModel::new(ids.iter().map(|id| node(id, &[])).collect());
			for _ in 0..80 {
				let child = &ids[rng.gen_range(0..ids.len())];
				let parent = &ids[rng.gen_range(0..ids.len())];
				let _ = graph.toggle_parent(child, parent);
				assert!(graph.nodes().iter().all(|n| !graph.is_ancestor(&n.id, &n.id)));
			}
		}
	}

	#[test]
	fn rejected_toggles_leave_graph_untouched() {
		let mut rng = StdRng::seed_from_u64(99);
		let ids: Vec<String> = (0..10).map(|i| format!("n{i}")).collect();
		let mut graph = GraphModel::new(ids.iter().map(|id| node(id, &[])).collect());
		for _ in 0..200 {
			let child = &ids[rng.gen_range(0..ids.len())];
			let parent = &ids[rng.gen_range(0..ids.len())];
			let before = graph.clone();
			if graph.toggle_parent(child, parent).is_err() {
				assert_eq!(graph, before);
			}
		}
	}
}
