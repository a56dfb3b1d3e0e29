//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{CatalogEntry, CatalogEntryDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Listing =====
    /// Explicit request for the next page
    ListLoadMore,
    /// Drop the accumulated list and start over from offset 0
    ListReload,
    ListPageDidLoad {
        generation: u64,
        offset: u32,
        summary_count: usize,
        entries: Vec<CatalogEntry>,
    },
    ListPageDidError {
        generation: u64,
        offset: u32,
        error: String,
    },
    ListSelectionMove(i16),
    ListSelect(usize),
    ListJumpTop,
    ListJumpBottom,
    /// Swap the preview between default sprite and alternate artwork
    ListToggleImage,

    // ===== Search =====
    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,

    // ===== Detail =====
    /// Navigate to `/pokemon/{id}`
    DetailOpen(String),
    DetailDidLoad {
        generation: u64,
        detail: CatalogEntryDetail,
    },
    DetailDidError {
        generation: u64,
        error: String,
    },
    /// Navigate back to `/`
    NavigateBack,

    // ===== Images =====
    ImageDidLoad { url: String, sprite: SpriteData },
    ImageDidError { url: String, error: String },

    UiTerminalResize(u16, u16),
    Quit,
}
