//! Application state - single source of truth

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::route::Route;
use crate::sprite::SpriteData;

/// Entries requested per page.
pub const PAGE_SIZE: u32 = 20;
/// Rows from the end of the filtered list at which the next page is requested.
pub const LOAD_AHEAD: usize = 3;
/// Moves listed on the detail screen.
pub const MOVES_SHOWN: usize = 15;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub default_image_url: Option<String>,
    pub alternate_image_url: Option<String>,
    pub type_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStat {
    pub name: String,
    pub base_value: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntryDetail {
    pub id: u32,
    pub name: String,
    pub height_decimetres: u32,
    pub weight_decagrams: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<BaseStat>,
    pub moves: Vec<String>,
    pub artwork_url: Option<String>,
}

impl CatalogEntryDetail {
    pub fn visible_moves(&self) -> &[String] {
        &self.moves[..self.moves.len().min(MOVES_SHOWN)]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Case-insensitive substring match on the entry name.
pub fn matches_search(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// Accumulated listing plus its load cursor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListingState {
    pub entries: Vec<CatalogEntry>,
    pub filtered_indices: Vec<usize>,
    pub selected_index: usize,
    pub offset: u32,
    pub has_more: bool,
    pub loading: bool,
    pub generation: u64,
    pub search: SearchState,
    /// Preview shows the alternate (artwork) image instead of the default sprite.
    pub show_alternate: bool,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            filtered_indices: Vec::new(),
            selected_index: 0,
            offset: 0,
            has_more: true,
            loading: false,
            generation: 0,
            search: SearchState::default(),
            show_alternate: false,
        }
    }
}

impl ListingState {
    /// A fresh listing whose loads are stamped with `generation`.
    pub fn with_generation(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.filtered_indices
            .iter()
            .filter_map(|idx| self.entries.get(*idx))
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.filtered_indices
            .get(self.selected_index)
            .and_then(|idx| self.entries.get(*idx))
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.filtered_indices.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.filtered_indices.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn rebuild_filtered(&mut self) {
        let query = self.search.query.as_str();
        self.filtered_indices = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches_search(&entry.name, query))
            .map(|(idx, _)| idx)
            .collect();

        if self.selected_index >= self.filtered_indices.len() {
            self.selected_index = self.filtered_indices.len().saturating_sub(1);
        }
    }

    /// Appends entries whose id is not yet present, keeping page order.
    /// Returns how many were appended.
    pub fn append_page(&mut self, incoming: Vec<CatalogEntry>) -> usize {
        let mut seen: HashSet<u32> = self.entries.iter().map(|entry| entry.id).collect();
        let before = self.entries.len();
        self.entries
            .extend(incoming.into_iter().filter(|entry| seen.insert(entry.id)));
        self.rebuild_filtered();
        self.entries.len() - before
    }

    /// Selection sits within [`LOAD_AHEAD`] rows of the end of the rendered list.
    pub fn near_end(&self) -> bool {
        !self.filtered_indices.is_empty()
            && self.selected_index + LOAD_AHEAD >= self.filtered_indices.len()
    }

    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }

    pub fn preview_image_url(&self) -> Option<String> {
        let entry = self.selected_entry()?;
        if self.show_alternate {
            entry.alternate_image_url.clone()
        } else {
            entry.default_image_url.clone()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DetailState {
    pub id: String,
    pub record: DataResource<CatalogEntryDetail>,
    pub generation: u64,
}

impl Default for DetailState {
    fn default() -> Self {
        Self {
            id: String::new(),
            record: DataResource::Empty,
            generation: 0,
        }
    }
}

/// The one image currently on screen. Nothing else is retained.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageState {
    pub url: Option<String>,
    pub sprite: Option<SpriteData>,
    pub loading: bool,
    pub failed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub route: Route,
    pub listing: ListingState,
    pub detail: DetailState,
    pub image: ImageState,
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::Listing)
    }
}

impl AppState {
    pub fn new(route: Route) -> Self {
        Self {
            terminal_size: (80, 24),
            route,
            listing: ListingState::default(),
            detail: DetailState::default(),
            image: ImageState::default(),
            message: None,
        }
    }

    pub fn current_detail(&self) -> Option<&CatalogEntryDetail> {
        match self.route {
            Route::Detail { .. } => self.detail.record.data(),
            Route::Listing => None,
        }
    }

    /// The image the active screen wants displayed.
    pub fn wanted_image_url(&self) -> Option<String> {
        match self.route {
            Route::Listing => self.listing.preview_image_url(),
            Route::Detail { .. } => self
                .current_detail()
                .and_then(|detail| detail.artwork_url.clone()),
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Route").entry("path", ron_string(&self.route.path())),
            DebugSection::new("Listing")
                .entry("loaded", ron_string(&self.listing.entries.len()))
                .entry("filtered", ron_string(&self.listing.filtered_indices.len()))
                .entry("selected", ron_string(&self.listing.selected_index))
                .entry("offset", ron_string(&self.listing.offset))
                .entry("has_more", ron_string(&self.listing.has_more))
                .entry("loading", ron_string(&self.listing.loading))
                .entry("generation", ron_string(&self.listing.generation))
                .entry("search", ron_string(&self.listing.search.query)),
            DebugSection::new("Detail")
                .entry("id", ron_string(&self.detail.id))
                .entry("loading", ron_string(&self.detail.record.is_loading()))
                .entry("failed", ron_string(&self.detail.record.is_failed()))
                .entry("generation", ron_string(&self.detail.generation)),
            DebugSection::new("Status")
                .entry("image", ron_string(&self.image.url))
                .entry("image_loading", ron_string(&self.image.loading))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
