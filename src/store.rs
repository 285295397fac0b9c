//! Owner-keyed persistence of the achievement graph.
//!
//! The editor never talks to storage itself: the host page loads the graph
//! once on mount and writes the full node list back on every save
//! (last write wins).

#[cfg(test)]
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_sys::Storage;

use crate::components::achievement_graph::AchievementNode;

/// Failures of a [`GraphStore`].
#[derive(Debug, Error)]
pub enum StoreError {
	/// `localStorage` is missing or blocked.
	#[error("storage is not available in this browser")]
	Unavailable,
	/// A stored record could not be encoded or decoded.
	#[error("could not encode graph: {0}")]
	Serialize(#[from] serde_json::Error),
	/// The browser rejected a storage call (quota, privacy mode).
	#[error("storage call failed: {0}")]
	Js(String),
	/// `update` was given an id with no record behind it.
	#[error("no stored graph with id `{0}`")]
	UnknownGraph(String),
}

/// One persisted graph record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredGraph {
	/// Generated on first save.
	pub id: String,
	/// Owner the graph is looked up by.
	pub owner: String,
	/// Full node list, replaced wholesale on every save.
	pub nodes: Vec<AchievementNode>,
}

/// Owner-keyed save/load pair used by the host page.
pub trait GraphStore {
	/// The owner's current graph, if one was saved.
	fn load(&self, owner: &str) -> Result<Option<StoredGraph>, StoreError>;

	/// Stores a new graph for `owner` and returns its id.
	fn save(&mut self, owner: &str, nodes: &[AchievementNode]) -> Result<String, StoreError>;

	/// Overwrites the nodes of an existing record.
	fn update(&mut self, id: &str, nodes: &[AchievementNode]) -> Result<(), StoreError>;
}

/// Updates `existing` when known, otherwise creates a new record.
pub fn save_or_update(
	store: &mut impl GraphStore,
	owner: &str,
	existing: Option<&str>,
	nodes: &[AchievementNode],
) -> Result<String, StoreError> {
	match existing {
		Some(id) => match store.update(id, nodes) {
			Ok(()) => Ok(id.to_string()),
			Err(StoreError::UnknownGraph(_)) => store.save(owner, nodes),
			Err(e) => Err(e),
		},
		None => store.save(owner, nodes),
	}
}

/// In-memory store, one graph per owner.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
	graphs: HashMap<String, StoredGraph>,
	owners: HashMap<String, String>,
}

#[cfg(test)]
impl GraphStore for MemoryStore {
	fn load(&self, owner: &str) -> Result<Option<StoredGraph>, StoreError> {
		Ok(self
			.owners
			.get(owner)
			.and_then(|id| self.graphs.get(id))
			.cloned())
	}

	fn save(&mut self, owner: &str, nodes: &[AchievementNode]) -> Result<String, StoreError> {
		let id = uuid::Uuid::new_v4().to_string();
		self.graphs.insert(
			id.clone(),
			StoredGraph {
				id: id.clone(),
				owner: owner.to_string(),
				nodes: nodes.to_vec(),
			},
		);
		self.owners.insert(owner.to_string(), id.clone());
		Ok(id)
	}

	/// Overwrites the nodes of an existing record.
	fn update(&mut self, id: &str, nodes: &[AchievementNode]) -> Result<(), StoreError> {
		let graph = self
			.graphs
			.get_mut(id)
			.ok_or_else(|| StoreError::UnknownGraph(id.to_string()))?;
		graph.nodes = nodes.to_vec();
		Ok(())
	}
}

/// `window.localStorage` backed store.
pub struct LocalStorageStore {
	storage: Storage,
	namespace: String,
}

impl LocalStorageStore {
	/// Opens `window.localStorage`, prefixing keys with `namespace`.
	pub fn open(namespace: impl Into<String>) -> Result<Self, StoreError> {
		let storage = web_sys::window()
			.ok_or(StoreError::Unavailable)?
			.local_storage()
			.map_err(js_error)?
			.ok_or(StoreError::Unavailable)?;
		Ok(Self {
			storage,
			namespace: namespace.into(),
		})
	}

	fn owner_key(&self, owner: &str) -> String {
		format!("{}:owner:{}", self.namespace, owner)
	}

	fn graph_key(&self, id: &str) -> String {
		format!("{}:graph:{}", self.namespace, id)
	}

	fn read_graph(&self, id: &str) -> Result<Option<StoredGraph>, StoreError> {
		match self.storage.get_item(&self.graph_key(id)).map_err(js_error)? {
			Some(json) => Ok(Some(serde_json::from_str(&json)?)),
			None => Ok(None),
		}
	}

	fn write_graph(&self, graph: &StoredGraph) -> Result<(), StoreError> {
		let json = serde_json::to_string(graph)?;
		self.storage
			.set_item(&self.graph_key(&graph.id), &json)
			.map_err(js_error)
	}
}

impl GraphStore for LocalStorageStore {
	fn load(&self, owner: &str) -> Result<Option<StoredGraph>, StoreError> {
		match self.storage.get_item(&self.owner_key(owner)).map_err(js_error)? {
			Some(id) => self.read_graph(&id),
			None => Ok(None),
		}
	}

	fn save(&mut self, owner: &str, nodes: &[AchievementNode]) -> Result<String, StoreError> {
		let graph = StoredGraph {
			id: uuid::Uuid::new_v4().to_string(),
			owner: owner.to_string(),
			nodes: nodes.to_vec(),
		};
		self.write_graph(&graph)?;
		self.storage
			.set_item(&self.owner_key(owner), &graph.id)
			.map_err(js_error)?;
		Ok(graph.id)
	}

	/// Overwrites the nodes of an existing record.
	fn update(&mut self, id: &str, nodes: &[AchievementNode]) -> Result<(), StoreError> {
		let mut graph = self
			.read_graph(id)?
			.ok_or_else(|| StoreError::UnknownGraph(id.to_string()))?;
		graph.nodes = nodes.to_vec();
		self.write_graph(&graph)
	}
}

fn js_error(err: wasm_bindgen::JsValue) -> StoreError {
	StoreError::Js(format!("{err:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn save_then_load_by_owner() {
		let mut store = MemoryStore::default();
		assert_eq!(store.load("alice").unwrap(), None);
		let nodes = vec![AchievementNode::new("Root")];
		let id = store.save("alice", &nodes).unwrap();
		let loaded = store.load("alice").unwrap().unwrap();
		assert_eq!(loaded.id, id);
		assert_eq!(loaded.nodes, nodes);
		assert_eq!(store.load("bob").unwrap(), None);
	}

	#[test]
	fn update_replaces_whole_node_list() {
		let mut store = MemoryStore::default();
		let id = store.save("alice", &[AchievementNode::new("a")]).unwrap();
		let newer = vec![AchievementNode::new("b"), AchievementNode::new("c")];
		store.update(&id, &newer).unwrap();
		assert_eq!(store.load("alice").unwrap().unwrap().nodes, newer);
		assert!(matches!(
			store.update("nope", &newer),
			Err(StoreError::UnknownGraph(_))
		));
	}

	#[test]
	fn save_or_update_falls_back_to_save() {
		let mut store = MemoryStore::default();
		let nodes = vec![AchievementNode::new("a")];
		let first = save_or_update(&mut store, "alice", None, &nodes).unwrap();
		let same = save_or_update(&mut store, "alice", Some(&first), &nodes).unwrap();
		assert_eq!(first, same);
		let fresh = save_or_update(&mut store, "alice", Some("stale"), &nodes).unwrap();
		assert_ne!(fresh, "stale");
		assert_eq!(store.load("alice").unwrap().unwrap().id, fresh);
	}
}
