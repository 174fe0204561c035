//! Core library for barcart.
//!
//! Everything that is not terminal presentation lives here:
//!
//! - `api`: the TheCocktailDB search client and the `RecipeSource` seam
//! - `models`: the typed `Recipe` and its wire decoding
//! - `storage`: the `Storage` key-value capability (disk and in-memory)
//! - `lookup`: the read-through Recipe Lookup Service and request sequencing
//! - `favorites`: the append-only Favorites Store
//! - `config`: on-disk configuration and directory resolution

pub mod api;
pub mod config;
pub mod favorites;
pub mod lookup;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError, RecipeSource};
pub use config::Config;
pub use favorites::FavoritesStore;
pub use lookup::{LookupError, RecipeLookup, RequestSequencer, RequestTicket};
pub use models::{Ingredient, Recipe};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
