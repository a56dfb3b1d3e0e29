//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::route::Route;
use crate::state::{AppState, DetailState, ImageState, ListingState, PAGE_SIZE};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            let effects = match state.route.clone() {
                Route::Listing => request_page(state).into_iter().collect(),
                Route::Detail { id } => open_detail(state, id),
            };
            finish(effects)
        }

        // ===== Listing =====
        Action::ListLoadMore => {
            if state.route != Route::Listing {
                return DispatchResult::unchanged();
            }
            match request_page(state) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::unchanged(),
            }
        }

        Action::ListReload => {
            let generation = state.listing.generation + 1;
            state.listing = ListingState::with_generation(generation);
            state.message = None;
            let mut effects: Vec<Effect> = request_page(state).into_iter().collect();
            effects.extend(sync_image(state));
            finish(effects)
        }

        Action::ListPageDidLoad {
            generation,
            offset,
            summary_count,
            entries,
        } => {
            if generation != state.listing.generation {
                return DispatchResult::unchanged();
            }
            let listing = &mut state.listing;
            listing.loading = false;
            listing.append_page(entries);
            listing.offset = offset.saturating_add(PAGE_SIZE);
            if summary_count < PAGE_SIZE as usize {
                listing.has_more = false;
            }
            state.message = None;
            finish(sync_image(state).into_iter().collect())
        }

        Action::ListPageDidError {
            generation,
            offset,
            error,
        } => {
            if generation != state.listing.generation {
                return DispatchResult::unchanged();
            }
            state.listing.loading = false;
            state.message = Some(format!("Page at offset {offset} failed: {error}"));
            DispatchResult::changed()
        }

        Action::ListSelectionMove(delta) => {
            let index = (state.listing.selected_index as i64 + delta as i64).max(0) as usize;
            select_index(state, index)
        }

        Action::ListSelect(index) => select_index(state, index),

        Action::ListJumpTop => select_index(state, 0),

        Action::ListJumpBottom => {
            let last = state.listing.filtered_indices.len().saturating_sub(1);
            select_index(state, last)
        }

        Action::ListToggleImage => {
            state.listing.show_alternate = !state.listing.show_alternate;
            finish(sync_image(state).into_iter().collect())
        }

        // ===== Search =====
        Action::SearchStart => {
            if state.listing.search.active {
                return DispatchResult::unchanged();
            }
            state.listing.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.listing.search.query.push(ch);
            refilter(state)
        }

        Action::SearchBackspace => {
            if state.listing.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            refilter(state)
        }

        Action::SearchSubmit => {
            state.listing.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            let search = &mut state.listing.search;
            if !search.active && search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            search.active = false;
            search.query.clear();
            refilter(state)
        }

        // ===== Detail =====
        Action::DetailOpen(id) => finish(open_detail(state, id)),

        Action::DetailDidLoad { generation, detail } => {
            if !detail_is_current(state, generation) {
                return DispatchResult::unchanged();
            }
            state.detail.record = DataResource::Loaded(detail);
            finish(sync_image(state).into_iter().collect())
        }

        Action::DetailDidError { generation, error } => {
            if !detail_is_current(state, generation) {
                return DispatchResult::unchanged();
            }
            state.detail.record = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::NavigateBack => {
            if state.route == Route::Listing {
                return DispatchResult::unchanged();
            }
            state.route = Route::Listing;
            state.detail = DetailState {
                generation: state.detail.generation,
                ..DetailState::default()
            };
            let mut effects = Vec::new();
            if state.listing.entries.is_empty() && state.listing.offset == 0 {
                effects.extend(request_page(state));
            }
            effects.extend(sync_image(state));
            finish(effects)
        }

        // ===== Images =====
        Action::ImageDidLoad { url, sprite } => {
            if state.image.url.as_deref() != Some(url.as_str()) {
                return DispatchResult::unchanged();
            }
            state.image.sprite = Some(sprite);
            state.image.loading = false;
            DispatchResult::changed()
        }

        Action::ImageDidError { url, error: _ } => {
            if state.image.url.as_deref() != Some(url.as_str()) {
                return DispatchResult::unchanged();
            }
            state.image.loading = false;
            state.image.failed = true;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn finish(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

/// Marks a page load in flight, unless exhausted or already loading.
fn request_page(state: &mut AppState) -> Option<Effect> {
    let listing = &mut state.listing;
    if !listing.can_load_more() {
        return None;
    }
    listing.loading = true;
    Some(Effect::LoadPage {
        generation: listing.generation,
        offset: listing.offset,
    })
}

fn select_index(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    let moved = state.listing.set_selected_index(index);
    let mut effects = Vec::new();
    if state.listing.near_end() {
        effects.extend(request_page(state));
    }
    effects.extend(sync_image(state));
    if !moved && effects.is_empty() {
        return DispatchResult::unchanged();
    }
    finish(effects)
}

fn refilter(state: &mut AppState) -> DispatchResult<Effect> {
    state.listing.rebuild_filtered();
    finish(sync_image(state).into_iter().collect())
}

fn open_detail(state: &mut AppState, id: String) -> Vec<Effect> {
    let generation = state.detail.generation + 1;
    state.route = Route::detail(id.clone());
    state.detail = DetailState {
        id: id.clone(),
        record: DataResource::Loading,
        generation,
    };
    let mut effects = vec![Effect::LoadDetail { generation, id }];
    effects.extend(sync_image(state));
    effects
}

fn detail_is_current(state: &AppState, generation: u64) -> bool {
    matches!(state.route, Route::Detail { .. }) && generation == state.detail.generation
}

/// Points the image slot at whatever the active screen wants to show.
fn sync_image(state: &mut AppState) -> Option<Effect> {
    let wanted = state.wanted_image_url();
    if wanted == state.image.url {
        return None;
    }
    state.image = ImageState {
        url: wanted.clone(),
        sprite: None,
        loading: wanted.is_some(),
        failed: false,
    };
    wanted.map(|url| Effect::LoadImage { url })
}
