use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::theme::{panel_style, title_style, ACCENT_GOLD, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::{
    handle_search_key, Component, DetailScreen, DetailScreenProps, ListingScreen,
    ListingScreenProps,
};
use crate::action::Action;
use crate::route::Route;
use crate::state::AppState;

pub struct AppShellProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Areas of the shell: title bar, active screen, status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Title bar and status bar around whichever screen the route selects.
pub struct AppShell {
    listing: ListingScreen,
    detail: DetailScreen,
    status_bar: StatusBar,
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AppShell {
    pub fn new() -> Self {
        Self {
            listing: ListingScreen::new(),
            detail: DetailScreen::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn layout(area: Rect) -> ShellLayout {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);
        ShellLayout {
            header: rows[0],
            body: rows[1],
            footer: rows[2],
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let listing = &state.listing;
        let line = Line::from(vec![
            Span::styled("Pokemon Explorer", title_style()),
            Span::raw("  "),
            Span::styled(state.route.path(), Style::default().fg(ACCENT_GOLD)),
            Span::raw("  |  Loaded: "),
            Span::styled(
                listing.entries.len().to_string(),
                Style::default().fg(TEXT_MAIN),
            ),
            Span::raw("  Shown: "),
            Span::styled(
                listing.filtered_indices.len().to_string(),
                Style::default().fg(TEXT_MAIN),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .style(panel_style())
            .border_style(Style::default().fg(TEXT_DIM));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn status_text(state: &AppState) -> String {
        if let Some(message) = state.message.as_ref() {
            return message.clone();
        }
        match state.route {
            Route::Listing if state.listing.loading => "Loading page...".to_string(),
            Route::Detail { .. } if state.detail.record.is_loading() => {
                "Loading entry...".to_string()
            }
            _ => String::new(),
        }
    }

    fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
        if state.listing.search.active && state.route == Route::Listing {
            return vec![
                StatusBarHint::new("Enter", "Apply"),
                StatusBarHint::new("Esc", "Clear"),
                StatusBarHint::new("Bksp", "Delete"),
            ];
        }
        match state.route {
            Route::Listing => vec![
                StatusBarHint::new("j/k", "Move"),
                StatusBarHint::new("Enter", "Open"),
                StatusBarHint::new("/", "Search"),
                StatusBarHint::new("a", "Image"),
                StatusBarHint::new("m", "More"),
                StatusBarHint::new("^R", "Reload"),
                StatusBarHint::new("q", "Quit"),
            ],
            Route::Detail { .. } => vec![
                StatusBarHint::new("Esc", "Back"),
                StatusBarHint::new("q", "Quit"),
            ],
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let status = Self::status_text(state);
        let hints = Self::status_hints(state);
        let status_items = [StatusBarItem::span(Span::styled(
            status.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: None,
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: title_style(),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}

impl Component<Action> for AppShell {
    type Props<'a> = AppShellProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        match state.route {
            Route::Listing if state.listing.search.active => handle_search_key(event),
            Route::Listing => self
                .listing
                .handle_event(
                    event,
                    ListingScreenProps {
                        state,
                        is_focused: props.is_focused,
                    },
                )
                .into_iter()
                .collect(),
            Route::Detail { .. } => self
                .detail
                .handle_event(
                    event,
                    DetailScreenProps {
                        state,
                        is_focused: props.is_focused,
                    },
                )
                .into_iter()
                .collect(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: AppShellProps<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let layout = Self::layout(area);
        Self::render_header(frame, layout.header, state);
        match state.route {
            Route::Listing => self.listing.render(
                frame,
                layout.body,
                ListingScreenProps {
                    state,
                    is_focused: props.is_focused,
                },
            ),
            Route::Detail { .. } => self.detail.render(
                frame,
                layout.body,
                DetailScreenProps {
                    state,
                    is_focused: props.is_focused,
                },
            ),
        }
        self.render_footer(frame, layout.footer, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn title_bar_shows_route_path() {
        let state = AppState::new(Route::detail("25"));
        let mut render = RenderHarness::new(100, 30);
        let mut shell = AppShell::new();

        let output = render.render_to_string_plain(|frame| {
            shell.render(
                frame,
                frame.area(),
                AppShellProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Pokemon Explorer"));
        assert!(output.contains("/pokemon/25"));
    }

    #[test]
    fn status_prefers_error_message() {
        let mut state = AppState::default();
        state.listing.loading = true;
        assert_eq!(AppShell::status_text(&state), "Loading page...");

        state.message = Some("Page at offset 20 failed: HTTP 500".into());
        assert_eq!(
            AppShell::status_text(&state),
            "Page at offset 20 failed: HTTP 500"
        );
    }
}
