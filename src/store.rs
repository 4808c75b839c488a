//! Observable recipe list
//!
//! [`RecipeStore`] is the single mutable collection the rest of the crate
//! shares. It is handed out as an `Arc` and announces every mutation on a
//! broadcast channel so views can refresh without polling.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::{debug, info, warn};
use tokio::sync::broadcast;

use crate::error::StoreError;
use crate::model::Recipe;

/// Change notification sent to store subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A recipe was appended at `index`
    Added { index: usize, recipe: Recipe },
    /// The store was emptied; `removed` recipes were dropped
    Cleared { removed: usize },
}

/// Ordered, append-only list of recipes with change notification
pub struct RecipeStore {
    recipes: RwLock<Vec<Recipe>>,
    tx: broadcast::Sender<StoreEvent>,
    path: Option<PathBuf>,
}

impl RecipeStore {
    /// Create an empty in-memory store
    ///
    /// `capacity` is the number of events buffered for slow subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            recipes: RwLock::new(Vec::new()),
            tx,
            path: None,
        }
    }

    /// Open a store persisted at `path`
    ///
    /// A missing file yields an empty store; the file is written after the
    /// first mutation.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let recipes: Vec<Recipe> = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!("Loaded {} recipes from {}", recipes.len(), path.display());

        let mut store = Self::new(capacity);
        store.recipes = RwLock::new(recipes);
        store.path = Some(path);
        Ok(store)
    }

    /// Append a recipe and notify subscribers
    ///
    /// With a backing file this rewrites the file before returning, which
    /// blocks the calling thread for the duration of the write. A failed
    /// write is logged; call [`RecipeStore::flush`] to observe it.
    pub fn add(&self, recipe: Recipe) {
        let mut recipes = self.recipes.write().unwrap_or_else(PoisonError::into_inner);
        recipes.push(recipe.clone());
        self.persist(&recipes);
        let index = recipes.len() - 1;
        debug!("Added recipe #{}: {}", index, recipe.display_title());
        // Sent under the write lock so events arrive in mutation order
        self.notify(StoreEvent::Added { index, recipe });
    }

    /// Remove every recipe and notify subscribers
    ///
    /// Blocks on file I/O like [`RecipeStore::add`].
    pub fn clear(&self) {
        let mut recipes = self.recipes.write().unwrap_or_else(PoisonError::into_inner);
        let removed = recipes.len();
        recipes.clear();
        self.persist(&recipes);
        debug!("Cleared {} recipes", removed);
        self.notify(StoreEvent::Cleared { removed });
    }

    /// Write the current contents to the backing file, reporting failure
    ///
    /// A no-op for in-memory stores.
    pub fn flush(&self) -> Result<(), StoreError> {
        let recipes = self.recipes.write().unwrap_or_else(PoisonError::into_inner);
        match &self.path {
            Some(path) => write_snapshot(path, &recipes),
            None => Ok(()),
        }
    }

    /// Receive every subsequent mutation
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Copy of the current contents in insertion order
    pub fn snapshot(&self) -> Vec<Recipe> {
        self.recipes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, index: usize) -> Option<Recipe> {
        self.recipes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.recipes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backing file, if persisted
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is not an error
        let _ = self.tx.send(event);
    }

    /// Write the snapshot; the caller holds the write lock so concurrent
    /// mutations reach the file in order.
    fn persist(&self, recipes: &[Recipe]) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_snapshot(path, recipes) {
            warn!("Failed to save recipes to {}: {}", path.display(), e);
        }
    }
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new(crate::config::AppConfig::default().event_capacity)
    }
}

fn write_snapshot(path: &Path, recipes: &[Recipe]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(recipes)?;
    // Atomic replace
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
