//! Store flows with EffectStoreTestHarness: dispatch, effects, async completion, render

use ratatui::{layout::Rect, Frame};
use tui_dispatch::testing::*;
use pokedex::{
    action::Action,
    components::{AppShell, AppShellProps, Component, NOT_FOUND_TEXT},
    effect::Effect,
    reducer::reducer,
    route::Route,
    state::{AppState, CatalogEntry, CatalogEntryDetail, PAGE_SIZE},
};

fn entries(ids: std::ops::Range<u32>) -> Vec<CatalogEntry> {
    ids.map(|id| CatalogEntry {
        id,
        name: format!("mon-{id}"),
        default_image_url: Some(format!("https://img.example/{id}.png")),
        alternate_image_url: None,
        type_names: vec!["normal".into()],
    })
    .collect()
}

fn bulbasaur() -> CatalogEntryDetail {
    CatalogEntryDetail {
        id: 1,
        name: "bulbasaur".into(),
        height_decimetres: 7,
        weight_decagrams: 69,
        types: vec!["grass".into(), "poison".into()],
        abilities: vec!["overgrow".into()],
        stats: Vec::new(),
        moves: vec!["razor-wind".into()],
        artwork_url: Some("https://img.example/art/1.png".into()),
    }
}

fn draw_shell(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut shell = AppShell::new();
    shell.render(
        frame,
        area,
        AppShellProps {
            state,
            is_focused: true,
        },
    );
}

#[test]
fn test_initial_page_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.listing.loading);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadPage {
                generation: 0,
                offset: 0
            }
        )
    });

    harness.complete_action(Action::ListPageDidLoad {
        generation: 0,
        offset: 0,
        summary_count: PAGE_SIZE as usize,
        entries: entries(1..21),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1);
    assert_eq!(changed, 1);
    harness.assert_state(|s| !s.listing.loading);
    harness.assert_state(|s| s.listing.entries.len() == 20);
    harness.assert_state(|s| s.listing.offset == PAGE_SIZE);

    let effects = harness.drain_effects();
    effects.effects_all_match(|e| matches!(e, Effect::LoadImage { .. }));
}

#[test]
fn test_scrolling_near_end_requests_next_page_once() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::ListPageDidLoad {
        generation: 0,
        offset: 0,
        summary_count: PAGE_SIZE as usize,
        entries: entries(1..21),
    });
    harness.drain_effects();

    harness.dispatch_collect(Action::ListSelect(17));
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadPage {
                offset: PAGE_SIZE,
                ..
            }
        )
    });

    // Still in flight: more proximity signals do not stack requests.
    harness.dispatch_collect(Action::ListSelect(19));
    harness.dispatch_collect(Action::ListLoadMore);
    let effects = harness.drain_effects();
    effects.effects_none_match(|e| matches!(e, Effect::LoadPage { .. }));
}

#[test]
fn test_failed_page_can_be_retried() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::ListPageDidError {
        generation: 0,
        offset: 0,
        error: "request failed: connection refused".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.listing.entries.is_empty());
    harness.assert_state(|s| s.listing.has_more);
    harness.assert_state(|s| s.message.is_some());

    harness.dispatch_collect(Action::ListLoadMore);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { offset: 0, .. }));

    let output = harness.render_plain(180, 30, draw_shell);
    assert!(output.contains("connection refused"));
}

#[test]
fn test_stale_page_after_reload_is_dropped() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_all([Action::Init, Action::ListReload]);
    harness.drain_effects();

    harness.complete_action(Action::ListPageDidLoad {
        generation: 0,
        offset: 0,
        summary_count: PAGE_SIZE as usize,
        entries: entries(1..21),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!((changed, total), (0, 1));
    harness.assert_state(|s| s.listing.entries.is_empty());
    harness.assert_state(|s| s.listing.loading);
}

#[test]
fn test_detail_open_and_load_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::DetailOpen("1".into()));
    harness.assert_state(|s| s.route == Route::detail("1"));
    harness.assert_state(|s| s.detail.record.is_loading());
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadDetail { generation: 1, .. }));

    harness.complete_action(Action::DetailDidLoad {
        generation: 1,
        detail: bulbasaur(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.detail.record.is_loaded());
    harness.assert_state(|s| s.image.url.as_deref() == Some("https://img.example/art/1.png"));
    let effects = harness.drain_effects();
    effects.effects_count(1);

    let output = harness.render_plain(100, 30, draw_shell);
    assert!(output.contains("Bulbasaur"));
    assert!(output.contains("Grass, Poison"));
    assert!(output.contains("/pokemon/1"));
}

#[test]
fn test_detail_not_found_renders() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(Route::detail("abc")), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::DetailDidError {
        generation: 1,
        error: "https://pokeapi.co/api/v2/pokemon/abc returned HTTP 404".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.detail.record.is_failed());
    let output = harness.render_plain(100, 30, draw_shell);
    assert!(output.contains(NOT_FOUND_TEXT));
}

#[test]
fn test_image_result_for_previous_selection_is_ignored() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::ListPageDidLoad {
        generation: 0,
        offset: 0,
        summary_count: PAGE_SIZE as usize,
        entries: entries(1..21),
    });
    harness.dispatch_collect(Action::ListSelectionMove(1));
    harness.drain_effects();

    harness.complete_action(Action::ImageDidError {
        url: "https://img.example/1.png".into(),
        error: "timeout".into(),
    });
    let (changed, _) = harness.process_emitted();

    assert_eq!(changed, 0);
    harness.assert_state(|s| s.image.url.as_deref() == Some("https://img.example/2.png"));
    harness.assert_state(|s| s.image.loading && !s.image.failed);
}
