//! Application state management for barcart.
//!
//! This module contains the `App` struct that owns the lookup service, the
//! favorites store and all UI state, and coordinates background lookups.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use barcart_core::lookup::{self, normalize_query};
use barcart_core::{
    ApiClient, Config, FavoritesStore, FileStorage, LookupError, MemoryStorage, Recipe,
    RecipeLookup, RequestSequencer, RequestTicket, Storage,
};

use crate::form::SearchForm;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background lookup channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of items to scroll on page up/down in the favorites list.
pub const PAGE_SCROLL_SIZE: usize = 5;

/// Storage the app runs against: files on disk, or memory with `--no-persist`.
pub type DynStorage = Box<dyn Storage>;

pub type Lookup = RecipeLookup<DynStorage, ApiClient>;
pub type Favorites = FavoritesStore<DynStorage>;

/// Open the recipe cache and favorites list described by `config`.
pub fn open_services(config: &Config, persist: bool) -> Result<(Lookup, Favorites)> {
    let (cache, saved): (DynStorage, DynStorage) = if persist {
        let cache_dir = config.recipe_cache_dir()?;
        let data_dir = config.data_dir()?;
        debug!(?cache_dir, ?data_dir, "Storage directories configured");
        (
            Box::new(FileStorage::open(&cache_dir).context("Failed to open recipe cache")?),
            Box::new(FileStorage::open(&data_dir).context("Failed to open favorites storage")?),
        )
    } else {
        (Box::new(MemoryStorage::new()), Box::new(MemoryStorage::new()))
    };

    let api = ApiClient::with_base_url(config.api_base_url(), config.request_timeout())
        .context("Failed to build HTTP client")?;

    Ok((RecipeLookup::new(cache, api), FavoritesStore::open(saved)))
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Result of a background lookup, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct LookupMessage {
    pub ticket: RequestTicket,
    pub query: String,
    pub result: Result<Recipe, LookupError>,
}

/// Main application state container
pub struct App {
    pub config: Config,
    lookup: Lookup,
    pub favorites: Favorites,

    // UI State
    pub state: AppState,
    pub form: SearchForm,
    pub favorites_selection: usize,

    // Result card
    pub recipe: Option<Recipe>,
    pub recipe_from_cache: bool,
    pub error: Option<String>,

    // Request tracking
    sequencer: RequestSequencer,
    pending: Option<RequestTicket>,

    // Background task channel
    lookup_rx: mpsc::Receiver<LookupMessage>,
    lookup_tx: mpsc::Sender<LookupMessage>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance from config
    pub fn new(config: Config, persist: bool) -> Result<Self> {
        let (lookup, favorites) = open_services(&config, persist)?;
        info!(favorites = favorites.len(), persist, "App services ready");
        Ok(Self::with_services(config, lookup, favorites))
    }

    pub fn with_services(config: Config, lookup: Lookup, favorites: Favorites) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            lookup,
            favorites,

            state: AppState::Normal,
            form: SearchForm::new(),
            favorites_selection: 0,

            recipe: None,
            recipe_from_cache: false,
            error: None,

            sequencer: RequestSequencer::new(),
            pending: None,

            lookup_rx: rx,
            lookup_tx: tx,

            status_message: None,
        }
    }

    /// True while the latest lookup is waiting on the network.
    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Submit the form: answer from cache immediately, otherwise fetch in the background.
    pub fn submit(&mut self) {
        let query = self.form.name.clone();
        if normalize_query(&query).is_empty() {
            self.status_message = Some("Enter a cocktail name to search".to_string());
            return;
        }

        self.error = None;
        self.recipe = None;
        self.status_message = None;
        let ticket = self.sequencer.issue();

        if let Some(recipe) = self.lookup.cached(&query) {
            debug!(query, ticket = ticket.id(), "Served from cache");
            self.pending = None;
            self.show_recipe(recipe, true);
            return;
        }

        self.pending = Some(ticket);
        self.status_message = Some(format!("Searching for \"{}\"...", query.trim()));

        let source = self.lookup.source().clone();
        let tx = self.lookup_tx.clone();

        tokio::spawn(async move {
            let result = lookup::fetch_best_match(&source, &query).await;
            let message = LookupMessage {
                ticket,
                query,
                result,
            };
            if tx.send(message).await.is_err() {
                debug!("Lookup channel closed before result was delivered");
            }
        });
    }

    /// Check for completed background lookups and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.lookup_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_lookup_result(result);
        }
    }

    /// Apply one lookup result.
    ///
    /// Successful results are always cached; only the latest ticket's result
    /// reaches the result card.
    pub fn process_lookup_result(&mut self, message: LookupMessage) {
        let current = self.sequencer.is_current(message.ticket);

        match message.result {
            Ok(recipe) => {
                self.lookup.remember(&message.query, &recipe);
                if current {
                    self.show_recipe(recipe, false);
                } else {
                    debug!(ticket = message.ticket.id(), name = %recipe.name, "Discarding stale lookup result");
                }
            }
            Err(e) => {
                warn!(query = %message.query, error = %e, stale = !current, "Lookup failed");
                if current {
                    self.error = Some(e.user_message().to_string());
                }
            }
        }

        if current {
            self.pending = None;
            self.status_message = None;
        }
    }

    fn show_recipe(&mut self, recipe: Recipe, from_cache: bool) {
        self.error = None;
        self.recipe = Some(recipe);
        self.recipe_from_cache = from_cache;
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Append the displayed recipe to favorites. No-op without a recipe.
    pub fn save_favorite(&mut self) {
        let Some(recipe) = self.recipe.clone() else {
            self.status_message = Some("Nothing to save yet".to_string());
            return;
        };
        let name = recipe.name.clone();

        self.status_message = Some(match self.favorites.save(recipe) {
            Ok(()) => format!("Saved {name} to favorites"),
            Err(e) => format!("Saved {name}, but favorites could not be written: {e}"),
        });
        self.favorites_selection = self.favorites.len().saturating_sub(1);
    }

    pub fn scroll_favorites(&mut self, delta: isize) {
        let max = self.favorites.len().saturating_sub(1);
        self.favorites_selection = self
            .favorites_selection
            .saturating_add_signed(delta)
            .min(max);
    }
}

// ============================================================================
// Tests
// ============================================================================
