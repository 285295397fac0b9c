//! Read-only view of the host's item catalog.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
	pub id: String,
	pub name: String,
	/// Image URL used as the node icon.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub texture: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemCatalog {
	pub categories: Vec<Category>,
	pub items: Vec<CatalogItem>,
}

impl ItemCatalog {
	pub fn new(categories: Vec<Category>, items: Vec<CatalogItem>) -> Self {
		Self { categories, items }
	}

	pub fn item(&self, id: &str) -> Option<&CatalogItem> {
		self.items.iter().find(|i| i.id == id)
	}

	/// Items in `category`, or every item for `None`.
	pub fn items_in<'a>(
		&'a self,
		category: Option<&'a str>,
	) -> impl Iterator<Item = &'a CatalogItem> + 'a {
		self.items
			.iter()
			.filter(move |i| category.is_none() || i.category_id.as_deref() == category)
	}

	pub fn category(&self, id: &str) -> Option<&Category> {
		self.categories.iter().find(|c| c.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn catalog() -> ItemCatalog {
		let item = |id: &str, cat: Option<&str>| CatalogItem {
			id: id.into(),
			name: id.to_uppercase(),
			texture: None,
			category_id: cat.map(str::to_string),
		};
		ItemCatalog::new(
			vec![Category {
				id: "ores".into(),
				name: "Ores".into(),
				description: None,
			}],
			vec![item("iron", Some("ores")), item("gold", Some("ores")), item("stick", None)],
		)
	}

	#[test]
	fn filters_by_category() {
		let catalog = catalog();
		assert_eq!(catalog.items_in(None).count(), 3);
		let ores: Vec<_> = catalog.items_in(Some("ores")).map(|i| i.id.as_str()).collect();
		assert_eq!(ores, vec!["iron", "gold"]);
		assert_eq!(catalog.items_in(Some("wood")).count(), 0);
	}

	#[test]
	fn lookups_tolerate_unknown_ids() {
		let catalog = catalog();
		assert_eq!(catalog.item("iron").map(|i| i.name.as_str()), Some("IRON"));
		assert!(catalog.item("removed").is_none());
		assert_eq!(catalog.category("ores").map(|c| c.name.as_str()), Some("Ores"));
	}
}
