use super::interaction::{Interaction, PointerEffect};
use super::model::{GraphError, GraphModel, ParentToggle};
use super::types::{AchievementNode, NodeField, Position};
use super::viewport::{Viewport, node_position};

/// Padding added past the furthest node so it can be scrolled fully into view.
const CONTENT_MARGIN: f64 = 400.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
	Info,
	Error,
}

/// Short message shown in the side panel after a user action.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
	pub kind: NoticeKind,
	pub message: String,
}

impl Notice {
	pub fn info(message: impl Into<String>) -> Self {
		Self {
			kind: NoticeKind::Info,
			message: message.into(),
		}
	}

	pub fn error(message: impl ToString) -> Self {
		Self {
			kind: NoticeKind::Error,
			message: message.to_string(),
		}
	}
}

/// Everything the editor view owns: graph, viewport and pointer state.
///
/// Operations that act on "the selected node" are silent no-ops without a
/// selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
	pub graph: GraphModel,
	pub viewport: Viewport,
	pub interaction: Interaction,
}

impl EditorState {
	pub fn new(nodes: Vec<AchievementNode>) -> Self {
		Self {
			graph: GraphModel::new(nodes),
			..Default::default()
		}
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.interaction.selected.as_deref()
	}

	pub fn selected_node(&self) -> Option<&AchievementNode> {
		self.selected_id().and_then(|id| self.graph.get(id))
	}

	pub fn create_root(&mut self) -> String {
		self.graph.create_root_node()
	}

	pub fn create_child_of_selected(&mut self) -> Option<String> {
		let parent = self.selected_id()?.to_string();
		self.graph.create_child_node(&parent).ok()
	}

	/// Deletes the selected node if `confirm` agrees.
	pub fn delete_selected(&mut self, confirm: impl FnOnce(&AchievementNode) -> bool) -> bool {
		let Some(node) = self.selected_node() else {
			return false;
		};
		if !confirm(node) {
			return false;
		}
		let id = node.id.clone();
		let deleted = self.graph.delete_node(&id).is_ok();
		self.interaction.forget(&id);
		deleted
	}

	pub fn toggle_parent_of_selected(
		&mut self,
		parent_id: &str,
	) -> Result<Option<ParentToggle>, GraphError> {
		let Some(child) = self.selected_id().map(str::to_string) else {
			return Ok(None);
		};
		self.graph.toggle_parent(&child, parent_id).map(Some)
	}

	pub fn set_selected_field(&mut self, field: NodeField, value: &str) -> Result<(), GraphError> {
		match self.selected_id().map(str::to_string) {
			Some(id) => self.graph.set_node_field(&id, field, value),
			None => Ok(()),
		}
	}

	/// Replaces the graph and drops all pointer state that referenced it.
	pub fn replace_nodes(&mut self, nodes: Vec<AchievementNode>) {
		self.graph.replace_all(nodes);
		self.interaction = Interaction::default();
	}

	pub fn press_node(&mut self, id: &str, pointer: Position) {
		if let Some(model) = self.graph.position_of(id) {
			self.interaction.press_node(id, pointer, model, &self.viewport);
		}
	}

	pub fn press_background(&mut self, pointer: Position) {
		self.interaction.press_background(pointer);
	}

	/// Applies node moves; returns the scroll delta for background drags.
	pub fn pointer_move(&mut self, pointer: Position) -> Option<(f64, f64)> {
		match self.interaction.pointer_move(pointer, &self.viewport) {
			PointerEffect::None => None,
			PointerEffect::MoveNode { id, position } => {
				let _ = self.graph.set_position(&id, position);
				None
			}
			PointerEffect::Scroll { dx, dy } => Some((dx, dy)),
		}
	}

	pub fn release(&mut self) -> Option<String> {
		self.interaction.release()
	}

	/// Scrollable content size in screen pixels.
	pub fn content_extent(&self) -> (f64, f64) {
		let (w, h) = self
			.graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| self.viewport.box_origin(node_position(node, idx)))
			.fold((0.0_f64, 0.0_f64), |(w, h), p| (w.max(p.x), h.max(p.y)));
		(w + CONTENT_MARGIN, h + CONTENT_MARGIN)
	}
}
