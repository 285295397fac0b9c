mod color;
mod component;
mod interaction;
mod io;
mod listener;
mod model;
mod render;
mod state;
mod ticker;
mod types;
mod viewport;

pub use component::AchievementGraphEditor;
pub use types::{AchievementNode, Position};
