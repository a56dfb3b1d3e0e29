//! Reducer and keyboard tests using EffectStore and TestHarness

use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::{assert_emitted, assert_not_emitted, EffectStore, NumericComponentId};
use pokedex::{
    action::Action,
    components::{Component, DetailScreen, DetailScreenProps, ListingScreen, ListingScreenProps},
    effect::Effect,
    reducer::reducer,
    route::Route,
    state::{AppState, CatalogEntry, PAGE_SIZE},
};

fn entry(id: u32, name: &str) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
        default_image_url: Some(format!("https://img.example/{id}.png")),
        alternate_image_url: Some(format!("https://img.example/art/{id}.png")),
        type_names: vec!["normal".to_string()],
    }
}

fn page(offset: u32, ids: std::ops::Range<u32>) -> Action {
    let entries: Vec<CatalogEntry> = ids.map(|id| entry(id, &format!("mon-{id}"))).collect();
    Action::ListPageDidLoad {
        generation: 0,
        offset,
        summary_count: entries.len(),
        entries,
    }
}

fn ids(state: &AppState) -> Vec<u32> {
    state.listing.entries.iter().map(|entry| entry.id).collect()
}

#[test]
fn test_overlapping_pages_never_duplicate_ids() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(page(0, 1..21));
    store.dispatch(Action::ListLoadMore);

    // Second page overlaps the first by five entries.
    store.dispatch(page(PAGE_SIZE, 16..36));

    let loaded = ids(store.state());
    assert_eq!(loaded, (1..36).collect::<Vec<_>>());
}

#[test]
fn test_list_grows_monotonically_across_loads() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);

    let mut previous = 0;
    for (index, start) in [1u32, 21, 41].into_iter().enumerate() {
        if index > 0 {
            store.dispatch(Action::ListLoadMore);
        }
        store.dispatch(page(index as u32 * PAGE_SIZE, start..start + PAGE_SIZE));
        let len = store.state().listing.entries.len();
        assert!(len >= previous);
        previous = len;
    }
    assert_eq!(previous, 60);
    assert_eq!(store.state().listing.offset, 3 * PAGE_SIZE);
}

#[test]
fn test_short_page_disables_further_loading() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(page(0, 1..8));

    assert!(!store.state().listing.has_more);

    // Proximity signals after exhaustion emit nothing.
    let result = store.dispatch(Action::ListJumpBottom);
    assert!(!result.effects.iter().any(|e| matches!(e, Effect::LoadPage { .. })));
    let result = store.dispatch(Action::ListLoadMore);
    assert!(result.effects.is_empty());
    let result = store.dispatch(Action::ListSelectionMove(1));
    assert!(result.effects.is_empty());
}

#[test]
fn test_search_never_fetches_or_moves_cursor() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::ListPageDidLoad {
        generation: 0,
        offset: 0,
        summary_count: PAGE_SIZE as usize,
        entries: vec![
            entry(1, "bulbasaur"),
            entry(4, "charmander"),
            entry(5, "charmeleon"),
            entry(7, "squirtle"),
        ],
    });
    let before = ids(store.state());

    store.dispatch(Action::SearchStart);
    for ch in "CHAR".chars() {
        let result = store.dispatch(Action::SearchInput(ch));
        assert!(!result.effects.iter().any(|e| matches!(e, Effect::LoadPage { .. })));
    }

    let listing = &store.state().listing;
    let shown: Vec<&str> = listing
        .visible_entries()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(shown, vec!["charmander", "charmeleon"]);
    assert_eq!(listing.offset, PAGE_SIZE);
    assert!(listing.has_more);
    assert_eq!(ids(store.state()), before);

    store.dispatch(Action::SearchCancel);
    let listing = &store.state().listing;
    let restored: Vec<u32> = listing.visible_entries().map(|entry| entry.id).collect();
    assert_eq!(restored, before);
}

#[test]
fn test_search_with_no_match_keeps_loaded_entries() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(page(0, 1..21));

    store.dispatch(Action::SearchStart);
    for ch in "zzz".chars() {
        store.dispatch(Action::SearchInput(ch));
    }

    assert_eq!(store.state().listing.visible_entries().count(), 0);
    assert_eq!(store.state().listing.entries.len(), 20);
    assert!(store.state().listing.selected_entry().is_none());
}

#[test]
fn test_reload_starts_a_fresh_listing() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(page(0, 1..21));

    let result = store.dispatch(Action::ListReload);

    assert!(store.state().listing.entries.is_empty());
    assert_eq!(store.state().listing.offset, 0);
    assert_eq!(
        result.effects,
        vec![Effect::LoadPage {
            generation: 1,
            offset: 0
        }]
    );
}

#[test]
fn test_detail_failure_sets_not_found_state() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let result = store.dispatch(Action::DetailOpen("missingno".into()));
    assert_eq!(
        result.effects,
        vec![Effect::LoadDetail {
            generation: 1,
            id: "missingno".into()
        }]
    );

    store.dispatch(Action::DetailDidError {
        generation: 1,
        error: "HTTP 404".into(),
    });

    assert!(store.state().detail.record.is_failed());
    assert_eq!(store.state().route, Route::detail("missingno"));
}

#[test]
fn test_navigate_back_keeps_listing_intact() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(page(0, 1..21));
    store.dispatch(Action::ListSelect(4));

    store.dispatch(Action::DetailOpen("5".into()));
    let result = store.dispatch(Action::NavigateBack);

    let state = store.state();
    assert_eq!(state.route, Route::Listing);
    assert_eq!(state.listing.entries.len(), 20);
    assert_eq!(state.listing.selected_index, 4);
    assert!(state.detail.record.is_empty());
    assert!(!result.effects.iter().any(|e| matches!(e, Effect::LoadPage { .. })));
    assert!(result.effects.contains(&Effect::LoadImage {
        url: "https://img.example/5.png".into()
    }));
}

#[test]
fn test_back_from_deep_link_loads_first_page() {
    let mut store = EffectStore::new(AppState::new(Route::detail("25")), reducer);
    store.dispatch(Action::Init);

    let result = store.dispatch(Action::NavigateBack);

    assert_eq!(
        result.effects,
        vec![Effect::LoadPage {
            generation: 0,
            offset: 0
        }]
    );
}

#[test]
fn test_toggle_image_switches_preview_url() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(page(0, 1..21));

    let result = store.dispatch(Action::ListToggleImage);

    assert_eq!(
        result.effects,
        vec![Effect::LoadImage {
            url: "https://img.example/art/1.png".into()
        }]
    );
    assert!(store.state().image.loading);
}

#[test]
fn test_listing_keys_through_component() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState::default());
    let mut component = ListingScreen::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("m a", |state, event| {
        let props = ListingScreenProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(2);
    assert_emitted!(actions, Action::ListLoadMore);
    assert_emitted!(actions, Action::ListToggleImage);
    assert_not_emitted!(actions, Action::Quit);
}

#[test]
fn test_detail_screen_ignores_keys_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState::new(Route::detail("1")));
    let mut component = DetailScreen::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("h", |state, event| {
        let props = DetailScreenProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}
