use super::types::Position;
use super::viewport::Viewport;

/// Pointer travel (screen px) below which a press on a node is a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

pub const Z_SELECTED: u32 = 10;
pub const Z_DRAGGED: u32 = 9;
pub const Z_HOVERED: u32 = 6;
pub const Z_DEFAULT: u32 = 5;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragMode {
	#[default]
	Idle,
	Node {
		id: String,
		grab: Position,
		start: Position,
		moved: bool,
	},
	Background {
		last: Position,
	},
}

/// What the host has to apply after a pointer move.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEffect {
	None,
	MoveNode { id: String, position: Position },
	/// Amount to add to the container's native scroll offsets.
	Scroll { dx: f64, dy: f64 },
}

/// Drag, selection and hover state. Pointer positions are client pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
	pub drag: DragMode,
	pub selected: Option<String>,
	pub hovered: Option<String>,
}

impl Interaction {
	pub fn is_dragging(&self) -> bool {
		self.drag != DragMode::Idle
	}

	/// Node currently being dragged, once it has actually moved.
	pub fn dragged_node(&self) -> Option<&str> {
		match &self.drag {
			DragMode::Node { id, moved: true, .. } => Some(id),
			_ => None,
		}
	}

	pub fn press_node(&mut self, id: &str, pointer: Position, node: Position, viewport: &Viewport) {
		self.drag = DragMode::Node {
			id: id.to_string(),
			grab: viewport.grab_offset(pointer, node),
			start: pointer,
			moved: false,
		};
	}

	pub fn press_background(&mut self, pointer: Position) {
		self.drag = DragMode::Background { last: pointer };
	}

	pub fn pointer_move(&mut self, pointer: Position, viewport: &Viewport) -> PointerEffect {
		match &mut self.drag {
			DragMode::Idle => PointerEffect::None,
			DragMode::Node {
				id,
				grab,
				start,
				moved,
			} => {
				if !*moved {
					let travel = (pointer.x - start.x).hypot(pointer.y - start.y);
					if travel < DRAG_THRESHOLD {
						return PointerEffect::None;
					}
					*moved = true;
				}
				PointerEffect::MoveNode {
					id: id.clone(),
					position: viewport.drag_target(pointer, *grab),
				}
			}
			DragMode::Background { last } => {
				let (dx, dy) = (pointer.x - last.x, pointer.y - last.y);
				*last = pointer;
				PointerEffect::Scroll { dx: -dx, dy: -dy }
			}
		}
	}

	/// Ends any drag. Returns the node id when the press was a click.
	pub fn release(&mut self) -> Option<String> {
		match std::mem::take(&mut self.drag) {
			DragMode::Node { id, moved: false, .. } => {
				self.selected = Some(id.clone());
				Some(id)
			}
			_ => None,
		}
	}

	pub fn select(&mut self, id: Option<String>) {
		self.selected = id;
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	pub fn hover_enter(&mut self, id: &str) {
		self.hovered = Some(id.to_string());
	}

	pub fn hover_leave(&mut self, id: &str) {
		if self.hovered.as_deref() == Some(id) {
			self.hovered = None;
		}
	}

	pub fn z_index(&self, id: &str) -> u32 {
		if self.is_selected(id) {
			Z_SELECTED
		} else if self.dragged_node() == Some(id) {
			Z_DRAGGED
		} else if self.hovered.as_deref() == Some(id) {
			Z_HOVERED
		} else {
			Z_DEFAULT
		}
	}

	/// Whether the description popover of `id` should show.
	pub fn shows_popover(&self, id: &str) -> bool {
		self.is_selected(id) || self.hovered.as_deref() == Some(id)
	}

	/// Drops references to a node that no longer exists.
	pub fn forget(&mut self, id: &str) {
		if self.is_selected(id) {
			self.selected = None;
		}
		self.hover_leave(id);
		if matches!(&self.drag, DragMode::Node { id: dragged, .. } if dragged == id) {
			self.drag = DragMode::Idle;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(x: f64, y: f64) -> Position {
		Position::new(x, y)
	}

	#[test]
	fn press_and_release_without_motion_is_a_click() {
		let vp = Viewport::default();
		let mut ix = Interaction::default();
		ix.press_node("a", p(10.0, 10.0), p(0.0, 0.0), &vp);
		assert_eq!(ix.pointer_move(p(11.0, 11.0), &vp), PointerEffect::None);
		assert_eq!(ix.release(), Some("a".to_string()));
		assert!(ix.is_selected("a"));
		assert!(!ix.is_dragging());
	}

	#[test]
	fn drag_moves_node_and_suppresses_click() {
		let mut vp = Viewport::default();
		vp.set_scale(2.0);
		let mut ix = Interaction::default();
		ix.press_node("a", p(210.0, 110.0), p(100.0, 50.0), &vp);
		assert_eq!(
			ix.pointer_move(p(230.0, 150.0), &vp),
			PointerEffect::MoveNode {
				id: "a".into(),
				position: p(110.0, 70.0)
			}
		);
		assert_eq!(ix.dragged_node(), Some("a"));
		assert_eq!(ix.z_index("a"), Z_DRAGGED);
		assert_eq!(ix.release(), None);
		assert_eq!(ix.selected, None);
	}

	#[test]
	fn background_drag_scrolls_incrementally() {
		let vp = Viewport::default();
		let mut ix = Interaction::default();
		ix.press_background(p(100.0, 100.0));
		assert_eq!(
			ix.pointer_move(p(120.0, 90.0), &vp),
			PointerEffect::Scroll { dx: -20.0, dy: 10.0 }
		);
		assert_eq!(
			ix.pointer_move(p(125.0, 90.0), &vp),
			PointerEffect::Scroll { dx: -5.0, dy: -0.0 }
		);
		assert_eq!(ix.release(), None);
		assert_eq!(ix.pointer_move(p(0.0, 0.0), &vp), PointerEffect::None);
	}

	#[test]
	fn z_order_prefers_selection_then_drag_then_hover() {
		let vp = Viewport::default();
		let mut ix = Interaction::default();
		ix.hover_enter("h");
		ix.select(Some("s".into()));
		ix.press_node("d", p(0.0, 0.0), p(0.0, 0.0), &vp);
		ix.pointer_move(p(50.0, 0.0), &vp);
		assert_eq!(ix.z_index("s"), Z_SELECTED);
		assert_eq!(ix.z_index("d"), Z_DRAGGED);
		assert_eq!(ix.z_index("h"), Z_HOVERED);
		assert_eq!(ix.z_index("other"), Z_DEFAULT);
	}

	#[test]
	fn hover_is_independent_of_selection() {
		let mut ix = Interaction::default();
		ix.hover_enter("a");
		ix.hover_enter("b");
		ix.hover_leave("a");
		assert_eq!(ix.hovered.as_deref(), Some("b"));
		assert!(ix.shows_popover("b"));
		ix.hover_leave("b");
		assert!(!ix.shows_popover("b"));
	}

	#[test]
	fn forget_clears_every_reference() {
		let vp = Viewport::default();
		let mut ix = Interaction::default();
		ix.select(Some("a".into()));
		ix.hover_enter("a");
		ix.press_node("a", p(0.0, 0.0), p(0.0, 0.0), &vp);
		ix.forget("a");
		assert_eq!(ix, Interaction::default());
	}
}
