use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	Blob, BlobPropertyBag, CanvasRenderingContext2d, Event, File, FileReader, HtmlAnchorElement,
	HtmlInputElement, MouseEvent, Url,
};

use super::color::{DEFAULT_GLOW, GLOW_PRESETS, inherited_color, own_color};
use super::io;
use super::listener::DragListeners;
use super::render;
use super::state::{EditorState, Notice, NoticeKind};
use super::ticker::Ticker;
use super::types::{AchievementNode, NodeField, Position};
use super::viewport::{MAX_SCALE, MIN_SCALE, SCALE_STEP};
use crate::components::item_catalog::{CatalogItem, ItemCatalog};

/// Which editing section of the side panel is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Panel {
	None,
	Name,
	Item,
	Description,
	Color,
	Parents,
}

fn client_pos(ev: &MouseEvent) -> Position {
	Position::new(ev.client_x() as f64, ev.client_y() as f64)
}

/// Interactive editor for the achievement dependency graph.
///
/// Node boxes are DOM elements inside a scroll container; edges are drawn on
/// a canvas behind them every animation frame. The host receives the full
/// node list through `on_save`.
#[component]
pub fn AchievementGraphEditor(
	initial_nodes: Vec<AchievementNode>,
	catalog: ItemCatalog,
	#[prop(into)] on_save: Callback<Vec<AchievementNode>>,
	#[prop(into)] on_switch_mode: Callback<()>,
) -> impl IntoView {
	log::info!("achievement graph editor mounted with {} nodes", initial_nodes.len());

	let editor = RwSignal::new(EditorState::new(initial_nodes));
	let notice = RwSignal::new(None::<Notice>);
	let panel = RwSignal::new(Panel::None);
	let catalog = StoredValue::new(catalog);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let file_ref = NodeRef::<leptos::html::Input>::new();
	let ticker = StoredValue::new_local(None::<Ticker>);
	let drag_listeners = StoredValue::new_local(None::<DragListeners>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if ticker.with_value(Option::is_some) {
			return;
		}
		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>(),
			_ => {
				log::warn!("canvas 2d context unavailable");
				return;
			}
		};
		let Ok(ctx) = ctx else {
			return;
		};

		let started = Ticker::start(move |time| {
			let (w, h) = (canvas.offset_width(), canvas.offset_height());
			if canvas.width() != w as u32 || canvas.height() != h as u32 {
				canvas.set_width(w as u32);
				canvas.set_height(h as u32);
			}
			editor.try_with_untracked(|s| {
				render::render(&s.graph, &s.viewport, time, &ctx, w as f64, h as f64)
			});
		});
		match started {
			Ok(t) => ticker.set_value(Some(t)),
			Err(err) => log::warn!("could not start render loop: {err:?}"),
		}
	});

	on_cleanup(move || {
		ticker.try_update_value(|t| t.take());
		drag_listeners.try_update_value(|l| l.take());
		log::info!("achievement graph editor unmounted");
	});

	let begin_drag = move || {
		let on_move = move |ev: MouseEvent| {
			let delta = editor.try_update(|s| s.pointer_move(client_pos(&ev))).flatten();
			if let (Some((dx, dy)), Some(container)) = (delta, container_ref.get_untracked()) {
				container.scroll_by_with_x_and_y(dx, dy);
			}
		};
		let on_up = move |_: MouseEvent| {
			if let Some(id) = editor.try_update(|s| s.release()).flatten() {
				log::debug!("selected node {id}");
			}
			drag_listeners.with_value(|l| {
				if let Some(l) = l {
					l.detach();
				}
			});
		};
		match DragListeners::attach(on_move, on_up) {
			Ok(listeners) => drag_listeners.set_value(Some(listeners)),
			Err(err) => log::warn!("could not listen for drag: {err:?}"),
		}
	};

	let on_background_down = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		editor.update(|s| s.press_background(client_pos(&ev)));
		begin_drag();
	};

	let on_scroll = move |_: Event| {
		if let Some(container) = container_ref.get_untracked() {
			let (x, y) = (container.scroll_left() as f64, container.scroll_top() as f64);
			editor.update(|s| s.viewport.set_scroll_offset(x, y));
		}
	};

	let apply_import = move |text: String| match io::parse_import(&text) {
		Ok(nodes) => {
			let count = nodes.len();
			editor.update(|s| s.replace_nodes(nodes));
			panel.set(Panel::None);
			log::info!("imported {count} nodes");
			notice.set(Some(Notice::info(format!("Imported {count} nodes."))));
		}
		Err(err) => {
			log::warn!("import rejected: {err}");
			notice.set(Some(Notice::error(err)));
		}
	};

	let on_import_file = move |ev: Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		input.set_value("");
		if let Err(err) = read_text(&file, apply_import) {
			log::warn!("could not read import file: {err:?}");
		}
	};

	let on_export = move |_: MouseEvent| {
		let result = editor
			.with_untracked(|s| io::export_json(s.graph.nodes()))
			.map_err(|e| JsValue::from_str(&e.to_string()))
			.and_then(|json| download_json(&json));
		match result {
			Ok(()) => log::info!("exported node list"),
			Err(err) => {
				log::warn!("export failed: {err:?}");
				notice.set(Some(Notice::error("Export failed.")));
			}
		}
	};

	let on_save_click = move |_: MouseEvent| {
		let nodes = editor.with_untracked(|s| s.graph.export_all());
		log::info!("saving {} nodes", nodes.len());
		on_save.run(nodes);
		notice.set(Some(Notice::info("Changes saved.")));
	};

	let on_delete = move |_: MouseEvent| {
		let deleted = editor.try_update(|s| {
			s.delete_selected(|node| {
				web_sys::window()
					.and_then(|w| {
						w.confirm_with_message(&format!("Delete node \"{}\"?", node.name))
							.ok()
					})
					.unwrap_or(false)
			})
		});
		if deleted == Some(true) {
			panel.set(Panel::None);
		}
	};

	let selected_id = Memo::new(move |_| editor.with(|s| s.selected_id().map(str::to_string)));
	let selected = Memo::new(move |_| editor.with(|s| s.selected_node().cloned()));
	let content_size = move || {
		let (w, h) = editor.with(|s| s.content_extent());
		format!("position: relative; width: {w}px; height: {h}px;")
	};

	view! {
		<div class="achievement-editor">
			<div class="editor-toolbar">
				<button class="button" on:click=move |_| on_switch_mode.run(())>
					"← Back to categories"
				</button>
				<span class="small">"Achievement node editor"</span>
			</div>

			<div class="editor-body">
				<div class="panel glass editor-canvas-panel">
					<canvas
						node_ref=canvas_ref
						class="edge-canvas"
						style="position: absolute; inset: 0; width: 100%; height: 100%; pointer-events: none; z-index: 1;"
					/>
					<div
						node_ref=container_ref
						class="node-container"
						class:dragging=move || editor.with(|s| s.interaction.is_dragging())
						style="position: absolute; inset: 0; overflow: auto; z-index: 2;"
						on:mousedown=on_background_down
						on:scroll=on_scroll
					>
						<div style=content_size>
							<For
								each=move || {
									editor
										.with(|s| {
											s.graph.nodes().iter().map(|n| n.id.clone()).collect::<Vec<_>>()
										})
								}
								key=|id| id.clone()
								children=move |id: String| node_view(id, editor, catalog, begin_drag)
							/>
						</div>
					</div>
				</div>

				<div class="editor-side">
					<div class="panel glass">
						<div class="panel-title">
							{move || format!("Zoom ({}%)", editor.with(|s| s.viewport.zoom_percent()))}
						</div>
						<input
							type="range"
							min=MIN_SCALE.to_string()
							max=MAX_SCALE.to_string()
							step=SCALE_STEP.to_string()
							prop:value=move || editor.with(|s| s.viewport.scale()).to_string()
							on:input=move |ev| {
								if let Ok(scale) = event_target_value(&ev).parse::<f64>() {
									editor.update(|s| {
										s.viewport.set_scale(scale);
									});
								}
							}
						/>
					</div>

					<div class="panel glass">
						<button class="button" on:click=move |_| {
							editor.update(|s| {
								s.create_root();
							});
						}>"➕ Create root node"</button>
						<button class="button" on:click=on_export>"📥 Export nodes"</button>
						<button
							class="button"
							on:click=move |_| {
								if let Some(input) = file_ref.get_untracked() {
									input.click();
								}
							}
						>
							"📤 Import nodes"
						</button>
						<input
							node_ref=file_ref
							type="file"
							accept=".json"
							style="display: none;"
							on:change=on_import_file
						/>
					</div>

					{move || {
						selected
							.get()
							.map(|node| {
								let child_count = editor.with(|s| s.graph.children_of(&node.id).count());
								view! {
									<div class="panel glass">
										<div class="panel-title">{format!("Selected: {}", node.name)}</div>
										<button class="button" on:click=move |_| {
											editor.update(|s| {
												s.create_child_of_selected();
											});
										}>{format!("➕ Create child ({child_count})")}</button>
										<button class="button" on:click=move |_| panel.set(Panel::Name)>
											"✏️ Rename"
										</button>
										<button class="button" on:click=move |_| panel.set(Panel::Item)>
											"📦 Set item"
											{node.item_id.is_some().then_some(" ✓")}
										</button>
										<button class="button" on:click=move |_| panel.set(Panel::Description)>
											"📝 Set description"
											{node.description.is_some().then_some(" ✓")}
										</button>
										<button class="button" on:click=move |_| panel.set(Panel::Color)>
											"🎨 Set glow color"
											{node.glow_color.is_some().then_some(" ✓")}
										</button>
										<button class="button" on:click=move |_| panel.set(Panel::Parents)>
											"🔗 Set parents"
											{(!node.parent_node_ids.is_empty())
												.then(|| format!(" ({})", node.parent_node_ids.len()))}
										</button>
										<button class="button danger" on:click=on_delete>
											"🗑️ Delete node"
										</button>
									</div>
								}
							})
					}}

					{move || {
						selected_id
							.get()
							.is_some()
							.then(|| edit_panel(panel.get(), editor, catalog, notice, panel))
					}}

					{move || {
						notice
							.get()
							.map(|n| {
								let class = match n.kind {
									NoticeKind::Info => "notice",
									NoticeKind::Error => "notice notice-error",
								};
								view! {
									<div class=class on:click=move |_| notice.set(None)>
										{n.message}
									</div>
								}
							})
					}}

					<button class="button primary" on:click=on_save_click>
						"✅ Save changes"
					</button>
				</div>
			</div>
		</div>
	}
}

fn node_view(
	id: String,
	editor: RwSignal<EditorState>,
	catalog: StoredValue<ItemCatalog>,
	begin_drag: impl Fn() + Copy + Send + Sync + 'static,
) -> impl IntoView {
	let node = {
		let id = id.clone();
		Memo::new(move |_| editor.with(|s| s.graph.get(&id).cloned()))
	};
	let style = {
		let id = id.clone();
		move || {
			editor.with(|s| {
				let Some(pos) = s.graph.position_of(&id) else {
					return String::from("display: none;");
				};
				let origin = s.viewport.box_origin(pos);
				format!(
					"position: absolute; left: {}px; top: {}px; z-index: {}; transform: scale({}); width: 60px; user-select: none;",
					origin.x,
					origin.y,
					s.interaction.z_index(&id),
					s.viewport.scale(),
				)
			})
		}
	};
	let tint = {
		let id = id.clone();
		move || {
			editor.with(|s| {
				let selected = s.interaction.is_selected(&id);
				let has_item = s.graph.get(&id).is_some_and(|n| n.item_id.is_some());
				let background = match (selected, inherited_color(&s.graph, &id)) {
					(true, Some(color)) => color.rgba(0.15),
					(true, None) => DEFAULT_GLOW.rgba(0.15),
					(false, Some(color)) => color.rgba(0.05),
					(false, None) if has_item => "rgba(109, 211, 255, 0.1)".to_string(),
					(false, None) => "rgba(255, 255, 255, 0.05)".to_string(),
				};
				format!("background: {background}; width: 60px; height: 60px; position: relative;")
			})
		}
	};
	let item = move || {
		node.get()
			.and_then(|n| n.item_id)
			.and_then(|item_id| catalog.with_value(|c| c.item(&item_id).cloned()))
	};
	let popover = {
		let id = id.clone();
		move || {
			let visible = editor.with(|s| s.interaction.shows_popover(&id));
			node.get()
				.and_then(|n| n.description)
				.filter(|d| visible && !d.is_empty())
				.map(|d| view! { <div class="node-popover">{d}</div> })
		}
	};

	let on_down = {
		let id = id.clone();
		move |ev: MouseEvent| {
			if ev.button() != 0 {
				return;
			}
			ev.stop_propagation();
			ev.prevent_default();
			editor.update(|s| s.press_node(&id, client_pos(&ev)));
			begin_drag();
		}
	};
	let on_enter = {
		let id = id.clone();
		move |_: MouseEvent| editor.update(|s| s.interaction.hover_enter(&id))
	};
	let on_leave = {
		let id = id.clone();
		move |_: MouseEvent| editor.update(|s| s.interaction.hover_leave(&id))
	};
	let on_context = move |ev: MouseEvent| {
		ev.prevent_default();
		editor.update(|s| s.interaction.select(Some(id.clone())));
	};

	view! {
		<div
			class="graph-node"
			style=style
			on:mousedown=on_down
			on:mouseenter=on_enter
			on:mouseleave=on_leave
			on:contextmenu=on_context
		>
			<button
				class="graph-node-button"
				style=tint
				title=move || {
					item()
						.map(|i| {
							let category = i.category_id.as_deref().and_then(|cat| {
								catalog.with_value(|c| c.category(cat).map(|c| c.name.clone()))
							});
							match category {
								Some(category) => format!("{} ({category})", i.name),
								None => i.name,
							}
						})
						.or_else(|| node.get().map(|n| n.name))
						.unwrap_or_default()
				}
			>
				{move || match item().and_then(|i| i.texture.map(|t| (t, i.name))) {
					Some((src, alt)) => view! { <img class="graph-node-icon" src=src alt=alt /> }.into_any(),
					None => view! { <span>"⭐"</span> }.into_any(),
				}}
			</button>
			<div class="graph-node-label muted">
				{move || node.get().map(|n| n.name).unwrap_or_default()}
			</div>
			{popover}
		</div>
	}
}

fn edit_panel(
	which: Panel,
	editor: RwSignal<EditorState>,
	catalog: StoredValue<ItemCatalog>,
	notice: RwSignal<Option<Notice>>,
	panel: RwSignal<Panel>,
) -> AnyView {
	let set_field = move |field: NodeField, value: String| {
		if let Some(Err(err)) = editor.try_update(|s| s.set_selected_field(field, &value)) {
			notice.set(Some(Notice::error(err)));
		}
	};
	let close = move |_: MouseEvent| panel.set(Panel::None);

	match which {
		Panel::None => ().into_any(),
		Panel::Name => view! {
			<div class="panel glass">
				<div class="panel-title">"Node name"</div>
				<input
					type="text"
					prop:value=selected_field(editor, |n| Some(n.name.clone()))
					on:change=move |ev| set_field(NodeField::Name, event_target_value(&ev))
				/>
				<button class="button" on:click=close>"Done"</button>
			</div>
		}
		.into_any(),
		Panel::Description => view! {
			<div class="panel glass">
				<div class="panel-title">"Description"</div>
				<textarea
					rows="4"
					prop:value=selected_field(editor, |n| n.description.clone())
					on:change=move |ev| set_field(NodeField::Description, event_target_value(&ev))
				/>
				<button class="button" on:click=close>"Done"</button>
			</div>
		}
		.into_any(),
		Panel::Color => view! {
			<div class="panel glass">
				<div class="panel-title">"Glow color"</div>
				<input
					type="color"
					prop:value=move || {
						editor
							.with(|s| s.selected_node().and_then(own_color))
							.unwrap_or(DEFAULT_GLOW)
							.to_hex()
					}
					on:input=move |ev| set_field(NodeField::GlowColor, event_target_value(&ev))
				/>
				<div class="swatches">
					{GLOW_PRESETS
						.iter()
						.map(move |&hex| {
							view! {
								<button
									class="swatch"
									style=format!("background: {hex};")
									title=hex
									on:click=move |_| set_field(NodeField::GlowColor, hex.to_string())
								/>
							}
						})
						.collect_view()}
				</div>
				<button class="button" on:click=move |_| set_field(NodeField::GlowColor, String::new())>
					"Clear"
				</button>
				<button class="button" on:click=close>"Done"</button>
			</div>
		}
		.into_any(),
		Panel::Item => item_panel(editor, catalog, panel, set_field).into_any(),
		Panel::Parents => parents_panel(editor, notice, panel).into_any(),
	}
}

fn selected_field(
	editor: RwSignal<EditorState>,
	f: fn(&AchievementNode) -> Option<String>,
) -> impl Fn() -> String + Send + Sync + 'static {
	move || editor.with(|s| s.selected_node().and_then(f)).unwrap_or_default()
}

fn item_panel(
	editor: RwSignal<EditorState>,
	catalog: StoredValue<ItemCatalog>,
	panel: RwSignal<Panel>,
	set_field: impl Fn(NodeField, String) + Copy + Send + Sync + 'static,
) -> impl IntoView {
	let category = RwSignal::new(None::<String>);
	let current = move || editor.with(|s| s.selected_node().and_then(|n| n.item_id.clone()));
	let tabs = catalog.with_value(|c| c.categories.clone());

	view! {
		<div class="panel glass">
			<div class="panel-title">"Assign item"</div>
			<div class="category-tabs">
				<button
					class="tab"
					class:active=move || category.with(Option::is_none)
					on:click=move |_| category.set(None)
				>
					"All"
				</button>
				{tabs
					.into_iter()
					.map(|cat| {
						let id = cat.id.clone();
						let active_id = cat.id.clone();
						view! {
							<button
								class="tab"
								class:active=move || category.with(|c| c.as_deref() == Some(active_id.as_str()))
								on:click=move |_| category.set(Some(id.clone()))
							>
								{cat.name}
							</button>
						}
					})
					.collect_view()}
			</div>
			<div class="item-grid">
				{move || {
					let filter = category.get();
					catalog
						.with_value(|c| c.items_in(filter.as_deref()).cloned().collect::<Vec<_>>())
						.into_iter()
						.map(|CatalogItem { id, name, texture, .. }| {
							let chosen_id = id.clone();
							let icon = match texture {
								Some(src) => view! { <img src=src alt=name.clone() /> }.into_any(),
								None => view! { <span>"📦"</span> }.into_any(),
							};
							view! {
								<button
									class="item-cell"
									class:chosen=move || current().as_deref() == Some(chosen_id.as_str())
									title=name
									on:click=move |_| {
										set_field(NodeField::ItemId, id.clone());
										panel.set(Panel::None);
									}
								>
									{icon}
								</button>
							}
						})
						.collect_view()
				}}
			</div>
			<button class="button" on:click=move |_| set_field(NodeField::ItemId, String::new())>
				"Clear item"
			</button>
			<button class="button" on:click=move |_| panel.set(Panel::None)>"Close"</button>
		</div>
	}
}

fn parents_panel(
	editor: RwSignal<EditorState>,
	notice: RwSignal<Option<Notice>>,
	panel: RwSignal<Panel>,
) -> impl IntoView {
	let toggle = move |parent_id: String| {
		match editor.try_update(|s| s.toggle_parent_of_selected(&parent_id)) {
			Some(Err(err)) => {
				log::warn!("parent change rejected: {err}");
				notice.set(Some(Notice::error(err)));
			}
			Some(Ok(Some(change))) => {
				log::debug!("{change:?} parent {parent_id}");
				notice.set(None);
			}
			_ => {}
		}
	};
	let candidates = move || {
		editor.with(|s| {
			let Some(child) = s.selected_node() else {
				return Vec::new();
			};
			s.graph
				.available_parents(&child.id)
				.into_iter()
				.map(|p| (p.id.clone(), p.name.clone(), child.has_parent(&p.id)))
				.collect::<Vec<_>>()
		})
	};

	view! {
		<div class="panel glass">
			<div class="panel-title">"Parents"</div>
			<div class="parent-list">
				{move || {
					let candidates = candidates();
					if candidates.is_empty() {
						return view! { <div class="small muted">"No available parents"</div> }.into_any();
					}
					candidates
						.into_iter()
						.map(|(id, name, attached)| {
							view! {
								<button
									class="parent-option"
									class:attached=attached
									on:click=move |_| toggle(id.clone())
								>
									{if attached { "☑ " } else { "☐ " }}
									{name}
								</button>
							}
						})
						.collect_view()
						.into_any()
				}}
			</div>
			<button class="button" on:click=move |_| panel.set(Panel::None)>"Close"</button>
		</div>
	}
}

fn read_text(file: &File, on_text: impl FnOnce(String) + 'static) -> Result<(), JsValue> {
	let reader = FileReader::new()?;
	let done = reader.clone();
	let onload = Closure::once_into_js(move || {
		if let Some(text) = done.result().ok().and_then(|r| r.as_string()) {
			on_text(text);
		}
	});
	reader.set_onload(Some(onload.unchecked_ref()));
	reader.read_as_text(file)
}

fn download_json(json: &str) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let document = window
		.document()
		.ok_or_else(|| JsValue::from_str("no document"))?;

	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let parts = js_sys::Array::of1(&JsValue::from_str(json));
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(&format!("nodes-{}.json", js_sys::Date::now() as u64));
	anchor.click();
	Url::revoke_object_url(&url)
}
