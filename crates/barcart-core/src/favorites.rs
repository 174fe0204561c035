//! Favorites Store: an append-only, persisted list of saved recipes.
//!
//! The whole list lives under one storage key and is rewritten on every save.
//! There is deliberately no remove or deduplicate; saving twice keeps both.

use tracing::{info, warn};

use crate::models::Recipe;
use crate::storage::{load_or_default, Storage, StorageError};

/// Storage key holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesStore<S> {
    storage: S,
    items: Vec<Recipe>,
}

impl<S: Storage> FavoritesStore<S> {
    /// Load persisted favorites; absent or malformed data starts an empty list.
    pub fn open(storage: S) -> Self {
        let items: Vec<Recipe> = load_or_default(&storage, FAVORITES_KEY, Vec::new());
        Self { storage, items }
    }

    /// Append `recipe` and persist the full list.
    ///
    /// On a storage error the in-memory list keeps the append; there is no rollback.
    pub fn save(&mut self, recipe: Recipe) -> Result<(), StorageError> {
        info!(name = %recipe.name, "Saving favorite");
        self.items.push(recipe);

        let json = serde_json::to_string(&self.items)?;
        self.storage.set(FAVORITES_KEY, &json).inspect_err(|e| {
            warn!(error = %e, count = self.items.len(), "Failed to persist favorites");
        })
    }

    /// The persisted list as currently stored.
    pub fn load(&self) -> Vec<Recipe> {
        load_or_default(&self.storage, FAVORITES_KEY, Vec::new())
    }

    /// The in-memory list, including appends whose persistence failed.
    pub fn items(&self) -> &[Recipe] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
