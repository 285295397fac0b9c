use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::color::{Rgb, edge_color};
use super::model::GraphModel;
use super::types::Position;
use super::viewport::{Viewport, node_position};

pub const LINE_WIDTH: f64 = 2.0;
pub const GLOW_WIDTH: f64 = 8.0;
pub const ARROW_SIZE: f64 = 10.0;
/// Distance the arrow tip is pulled back from the parent's center.
pub const ARROW_PULLBACK: f64 = 20.0;
const WING_ANGLE: f64 = PI / 6.0;

/// Per-frame opacities of the three edge layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
	pub glow: f64,
	pub line: f64,
	pub arrow: f64,
}

pub fn pulse(time_secs: f64) -> Pulse {
	let s = (time_secs * 2.0).sin();
	Pulse {
		glow: 0.1 + 0.1 * s,
		line: 0.4 + 0.2 * s,
		arrow: 0.6 + 0.2 * s,
	}
}

/// Screen-space geometry of one child -> parent edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGeometry {
	pub from: Position,
	pub to: Position,
	pub color: Rgb,
	/// Tip first, then the two wings.
	pub arrow: [Position; 3],
}

/// One edge per resolvable parent id; dangling ids are skipped.
pub fn edge_geometry(graph: &GraphModel, viewport: &Viewport) -> Vec<EdgeGeometry> {
	let nodes = graph.nodes();
	let by_id: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	let mut edges = Vec::new();
	for (idx, node) in nodes.iter().enumerate() {
		let from = viewport.anchor(node_position(node, idx));
		for parent_id in &node.parent_node_ids {
			let Some(&pidx) = by_id.get(parent_id.as_str()) else {
				continue;
			};
			let parent = &nodes[pidx];
			let to = viewport.anchor(node_position(parent, pidx));
			edges.push(EdgeGeometry {
				from,
				to,
				color: edge_color(parent),
				arrow: arrowhead(from, to, viewport.scale()),
			});
		}
	}
	edges
}

/// Triangle pointing at `to`, pulled back from it along the edge.
pub fn arrowhead(from: Position, to: Position, scale: f64) -> [Position; 3] {
	let angle = (to.y - from.y).atan2(to.x - from.x);
	let tip = Position::new(
		to.x - angle.cos() * ARROW_PULLBACK * scale,
		to.y - angle.sin() * ARROW_PULLBACK * scale,
	);
	let size = ARROW_SIZE * scale;
	let wing = |offset: f64| {
		Position::new(
			tip.x - (angle + offset).cos() * size,
			tip.y - (angle + offset).sin() * size,
		)
	};
	[tip, wing(-WING_ANGLE), wing(WING_ANGLE)]
}

pub fn render(
	graph: &GraphModel,
	viewport: &Viewport,
	time_secs: f64,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	ctx.clear_rect(0.0, 0.0, width, height);
	let pulse = pulse(time_secs);
	let scale = viewport.scale();
	ctx.set_line_cap("round");

	for edge in edge_geometry(graph, viewport) {
		stroke_line(ctx, &edge, edge.color.rgba(pulse.glow), GLOW_WIDTH * scale);
		stroke_line(ctx, &edge, edge.color.rgba(pulse.line), LINE_WIDTH * scale);

		let [tip, left, right] = edge.arrow;
		ctx.set_fill_style_str(&edge.color.rgba(pulse.arrow));
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(left.x, left.y);
		ctx.line_to(right.x, right.y);
		ctx.close_path();
		ctx.fill();
	}
}

fn stroke_line(ctx: &CanvasRenderingContext2d, edge: &EdgeGeometry, style: String, width: f64) {
	ctx.set_stroke_style_str(&style);
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(edge.from.x, edge.from.y);
	ctx.line_to(edge.to.x, edge.to.y);
	ctx.stroke();
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::achievement_graph::color::DEFAULT_GLOW;
	use crate::components::achievement_graph::types::AchievementNode;

	fn close(a: Position, b: Position) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
	}

	fn node(id: &str, parents: &[&str], pos: Option<(f64, f64)>) -> AchievementNode {
		AchievementNode {
			id: id.into(),
			name: id.into(),
			parent_node_ids: parents.iter().map(|p| p.to_string()).collect(),
			position: pos.map(|(x, y)| Position::new(x, y)),
			..Default::default()
		}
	}

	#[test]
	fn one_edge_per_resolvable_parent() {
		let mut parent = node("p", &[], Some((0.0, 0.0)));
		parent.glow_color = Some("#ff0000".into());
		let graph = GraphModel::new(vec![
			parent,
			node("q", &[], Some((0.0, 300.0))),
			node("c", &["p", "q", "gone"], Some((200.0, 0.0))),
		]);
		let edges = edge_geometry(&graph, &Viewport::default());
		assert_eq!(edges.len(), 2);
		assert_eq!(edges[0].from, Position::new(230.0, 30.0));
		assert_eq!(edges[0].to, Position::new(30.0, 30.0));
		assert_eq!(edges[0].color, Rgb::new(255, 0, 0));
		assert_eq!(edges[1].color, DEFAULT_GLOW);
	}

	#[test]
	fn unpositioned_nodes_use_grid_slots() {
		let graph = GraphModel::new(vec![node("a", &[], None), node("b", &["a"], None)]);
		let edges = edge_geometry(&graph, &Viewport::default());
		assert_eq!(edges[0].from, Position::new(280.0, 130.0));
		assert_eq!(edges[0].to, Position::new(130.0, 130.0));
	}

	#[test]
	fn arrow_is_pulled_back_and_scaled() {
		let arrow = arrowhead(Position::new(200.0, 0.0), Position::new(0.0, 0.0), 2.0);
		assert!(close(arrow[0], Position::new(40.0, 0.0)));
		let wing = 20.0 * (PI / 6.0).cos();
		assert!(close(arrow[1], Position::new(40.0 + wing, -10.0)));
		assert!(close(arrow[2], Position::new(40.0 + wing, 10.0)));
	}

	#[test]
	fn pulse_oscillates_within_bounds() {
		let p0 = pulse(0.0);
		assert_eq!(p0, Pulse { glow: 0.1, line: 0.4, arrow: 0.6 });
		for i in 0..100 {
			let p = pulse(i as f64 * 0.1);
			assert!((-1e-12..=0.2 + 1e-12).contains(&p.glow));
			assert!((0.2 - 1e-12..=0.6 + 1e-12).contains(&p.line));
			assert!((0.4 - 1e-12..=0.8 + 1e-12).contains(&p.arrow));
		}
		let period = pulse(PI);
		assert!((period.line - p0.line).abs() < 1e-9);
	}
}
