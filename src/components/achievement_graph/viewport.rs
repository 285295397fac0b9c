use super::types::{AchievementNode, Position};

pub const GRID_COLUMNS: usize = 3;
pub const GRID_SPACING: f64 = 150.0;
pub const GRID_OFFSET: f64 = 100.0;

/// Half the width of a node box; edges attach at the box center.
pub const NODE_HALF_WIDTH: f64 = 30.0;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 2.0;
pub const SCALE_STEP: f64 = 0.1;

/// Grid slot for a node without an explicit position.
pub fn fallback_position(index: usize) -> Position {
	Position::new(
		GRID_OFFSET + (index % GRID_COLUMNS) as f64 * GRID_SPACING,
		GRID_OFFSET + (index / GRID_COLUMNS) as f64 * GRID_SPACING,
	)
}

/// Model-space top-left of `node`, which sits at `index` in the node list.
pub fn node_position(node: &AchievementNode, index: usize) -> Position {
	node.position.unwrap_or_else(|| fallback_position(index))
}

/// Pan offset and zoom factor. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	/// Read back from the scroll container, in screen pixels.
	pub scroll_offset: Position,
	scale: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scroll_offset: Position::default(),
			scale: 1.0,
		}
	}
}

impl Viewport {
	pub fn scale(&self) -> f64 {
		self.scale
	}

	/// Clamps into `[MIN_SCALE, MAX_SCALE]` and returns the applied value.
	pub fn set_scale(&mut self, scale: f64) -> f64 {
		self.scale = if scale.is_finite() {
			scale.clamp(MIN_SCALE, MAX_SCALE)
		} else {
			1.0
		};
		self.scale
	}

	pub fn zoom_percent(&self) -> i64 {
		(self.scale * 100.0).round() as i64
	}

	pub fn set_scroll_offset(&mut self, x: f64, y: f64) {
		self.scroll_offset = Position::new(x, y);
	}

	/// `(model - scroll) * scale`.
	pub fn to_screen(&self, model: Position) -> Position {
		Position::new(
			(model.x - self.scroll_offset.x) * self.scale,
			(model.y - self.scroll_offset.y) * self.scale,
		)
	}

	/// Screen-space center of a node box whose top-left is `model`.
	pub fn anchor(&self, model: Position) -> Position {
		let p = self.to_screen(model);
		Position::new(p.x + NODE_HALF_WIDTH, p.y + NODE_HALF_WIDTH)
	}

	/// Offset of a node box inside the scroll container's content.
	pub fn box_origin(&self, model: Position) -> Position {
		Position::new(model.x * self.scale, model.y * self.scale)
	}

	/// Pointer offset captured at drag start so the node does not jump.
	pub fn grab_offset(&self, pointer: Position, model: Position) -> Position {
		let origin = self.box_origin(model);
		Position::new(pointer.x - origin.x, pointer.y - origin.y)
	}

	/// Model position that keeps the grabbed point under the pointer.
	pub fn drag_target(&self, pointer: Position, grab: Position) -> Position {
		Position::new(
			(pointer.x - grab.x) / self.scale,
			(pointer.y - grab.y) / self.scale,
		)
	}
}
