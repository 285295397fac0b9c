use std::collections::HashSet;

use super::model::GraphModel;
use super::types::AchievementNode;

/// An sRGB channel triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

/// Muted green used when no node in the chain defines a glow color.
pub const DEFAULT_GLOW: Rgb = Rgb::new(124, 242, 156);

/// Swatches offered next to the color picker.
pub const GLOW_PRESETS: [&str; 7] = [
	"#7cf29c", "#ff6b6b", "#4ecdc4", "#45b7d1", "#f9ca24", "#6c5ce7", "#a29bfe",
];

impl Rgb {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parses `#rrggbb` or `#rgb`. Anything else is `None`.
	pub fn parse_hex(s: &str) -> Option<Self> {
		let hex = s.trim().strip_prefix('#')?;
		if !hex.is_ascii() {
			return None;
		}
		let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
		match hex.len() {
			6 => Some(Self::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
			3 => {
				let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
				Some(Self::new(r * 17, g * 17, b * 17))
			}
			_ => None,
		}
	}

	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	pub fn rgba(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
	}
}

/// The node's own glow color, if set and parseable.
pub fn own_color(node: &AchievementNode) -> Option<Rgb> {
	node.glow_color.as_deref().and_then(Rgb::parse_hex)
}

/// Color of edges drawn toward `parent`.
pub fn edge_color(parent: &AchievementNode) -> Rgb {
	own_color(parent).unwrap_or(DEFAULT_GLOW)
}

/// Own color, else the first parent's resolved color, recursively.
/// `None` when no ancestor on the first-parent chain defines one.
pub fn inherited_color(graph: &GraphModel, id: &str) -> Option<Rgb> {
	let mut seen = HashSet::new();
	let mut current = graph.get(id)?;
	loop {
		if let Some(color) = own_color(current) {
			return Some(color);
		}
		if !seen.insert(current.id.as_str()) {
			return None;
		}
		current = graph.get(current.parent_node_ids.first()?)?;
	}
}

/// Resolved display color of a node, falling back to [`DEFAULT_GLOW`].
pub fn resolve_color(graph: &GraphModel, id: &str) -> Rgb {
	inherited_color(graph, id).unwrap_or(DEFAULT_GLOW)
}
