use leptos::prelude::*;

use crate::components::achievement_graph::{AchievementGraphEditor, AchievementNode};
use crate::components::item_catalog::{CatalogItem, Category, ItemCatalog};
use crate::config::AppConfig;
use crate::store::{GraphStore, LocalStorageStore, save_or_update};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
	Catalog,
	Graph,
}

/// Sample mod catalog shown until a real item source is wired in.
fn sample_catalog() -> ItemCatalog {
	let category = |id: &str, name: &str| Category {
		id: id.into(),
		name: name.into(),
		description: None,
	};
	let item = |id: &str, name: &str, category: &str| CatalogItem {
		id: id.into(),
		name: name.into(),
		texture: None,
		category_id: Some(category.into()),
	};

	ItemCatalog::new(
		vec![
			category("materials", "Materials"),
			category("tools", "Tools"),
			category("machines", "Machines"),
		],
		vec![
			item("log", "Log", "materials"),
			item("planks", "Planks", "materials"),
			item("iron_ingot", "Iron Ingot", "materials"),
			item("copper_wire", "Copper Wire", "materials"),
			item("stone_pickaxe", "Stone Pickaxe", "tools"),
			item("iron_pickaxe", "Iron Pickaxe", "tools"),
			item("wrench", "Wrench", "tools"),
			item("furnace", "Furnace", "machines"),
			item("crusher", "Crusher", "machines"),
			item("generator", "Generator", "machines"),
		],
	)
}

/// Loads the owner's stored graph, or an empty one.
fn load_graph(config: &AppConfig) -> (Vec<AchievementNode>, Option<String>) {
	let loaded = LocalStorageStore::open(config.storage_namespace.clone())
		.and_then(|store| store.load(&config.owner));
	match loaded {
		Ok(Some(graph)) => {
			log::info!("loaded graph {} ({} nodes)", graph.id, graph.nodes.len());
			(graph.nodes, Some(graph.id))
		}
		Ok(None) => (Vec::new(), None),
		Err(err) => {
			log::warn!("could not load stored graph: {err}");
			(Vec::new(), None)
		}
	}
}

/// Host page: browses the item catalog and opens the achievement editor.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let (initial, stored_id) = load_graph(&config);

	let catalog = StoredValue::new(sample_catalog());
	let mode = RwSignal::new(Mode::Catalog);
	let nodes = RwSignal::new(initial);
	let graph_id = RwSignal::new(stored_id);

	let (owner, namespace) = (config.owner.clone(), config.storage_namespace.clone());
	let on_save = Callback::new(move |saved: Vec<AchievementNode>| {
		let persisted = LocalStorageStore::open(namespace.clone()).and_then(|mut store| {
			save_or_update(&mut store, &owner, graph_id.get_untracked().as_deref(), &saved)
		});
		match persisted {
			Ok(id) => {
				log::info!("stored graph {id} for {owner}");
				graph_id.set(Some(id));
			}
			Err(err) => log::warn!("could not persist graph: {err}"),
		}
		nodes.set(saved);
	});
	let back_to_catalog = Callback::new(move |_: ()| mode.set(Mode::Catalog));

	view! {
		<div class="app-shell">
			{move || match mode.get() {
				Mode::Catalog => {
					view! {
						<CatalogOverview
							catalog=catalog.get_value()
							node_count=Signal::derive(move || nodes.with(Vec::len))
							on_open=Callback::new(move |_: ()| mode.set(Mode::Graph))
						/>
					}
						.into_any()
				}
				Mode::Graph => {
					view! {
						<AchievementGraphEditor
							initial_nodes=nodes.get_untracked()
							catalog=catalog.get_value()
							on_save=on_save
							on_switch_mode=back_to_catalog
						/>
					}
						.into_any()
				}
			}}
		</div>
	}
}

#[component]
fn CatalogOverview(
	catalog: ItemCatalog,
	#[prop(into)] node_count: Signal<usize>,
	on_open: Callback<()>,
) -> impl IntoView {
	let sections = catalog
		.categories
		.iter()
		.map(|category| {
			let items = catalog
				.items_in(Some(category.id.as_str()))
				.map(|item| view! { <li class="catalog-item">{item.name.clone()}</li> })
				.collect_view();
			view! {
				<section class="panel glass">
					<h2>{category.name.clone()}</h2>
					<ul>{items}</ul>
				</section>
			}
		})
		.collect_view();

	view! {
		<div class="catalog-overview">
			<header class="catalog-header">
				<h1>"Mod items"</h1>
				<button class="button primary" on:click=move |_| on_open.run(())>
					{move || format!("Open achievement graph ({} nodes)", node_count.get())}
				</button>
			</header>
			{sections}
		</div>
	}
}
