//! Runtime settings read once at startup.

use log::Level;

/// Application settings, overridable through URL query parameters
/// (`?owner=<id>&log=<level>&ns=<namespace>`).
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Maximum level forwarded to the browser console.
	pub log_level: Level,
	/// Key under which the host stores this user's graph.
	pub owner: String,
	/// Prefix for every `localStorage` key the app writes.
	pub storage_namespace: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			log_level: Level::Info,
			owner: "local".into(),
			storage_namespace: "achievement-graph".into(),
		}
	}
}

impl AppConfig {
	/// Defaults overridden by the current page's query string.
	pub fn from_location() -> Self {
		let mut config = Self::default();
		let search = web_sys::window().and_then(|w| w.location().search().ok());
		let Some(params) = search.and_then(|s| web_sys::UrlSearchParams::new_with_str(&s).ok())
		else {
			return config;
		};
		for key in ["owner", "log", "ns"] {
			if let Some(value) = params.get(key) {
				config.apply_param(key, &value);
			}
		}
		config
	}

	/// Applies one query parameter. Unknown keys and bad values are ignored.
	pub fn apply_param(&mut self, key: &str, value: &str) {
		let value = value.trim();
		if value.is_empty() {
			return;
		}
		match key {
			"owner" => self.owner = value.to_string(),
			"ns" => self.storage_namespace = value.to_string(),
			"log" => match value.parse() {
				Ok(level) => self.log_level = level,
				Err(_) => log::warn!("ignoring unknown log level `{value}`"),
			},
			_ => {}
		}
	}
}
