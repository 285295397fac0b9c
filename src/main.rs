use achievement_graph_editor::config::AppConfig;
use achievement_graph_editor::{App, init_logging};
use leptos::mount::mount_to_body;
use leptos::prelude::*;

fn main() {
	let config = AppConfig::from_location();
	init_logging(config.log_level);

	mount_to_body(move || {
		view! { <App config=config.clone() /> }
	})
}
