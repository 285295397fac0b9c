pub mod achievement_graph;
pub mod item_catalog;
