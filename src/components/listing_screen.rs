use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle,
};

use super::format::{capitalize, entry_number, join_capitalized};
use super::theme::{
    border_style, panel_style, title_style, ACCENT_GOLD, BG_HIGHLIGHT, TEXT_DIM, TEXT_MAIN,
};
use super::{Component, ImagePane, ImagePaneProps};
use crate::action::Action;
use crate::state::{AppState, ListingState};

const PAGE_JUMP: i16 = 10;

pub struct ListingScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Scrollable catalog list with a preview card for the selected entry.
pub struct ListingScreen {
    list: SelectList,
    preview: ImagePane,
}

impl Default for ListingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingScreen {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
            preview: ImagePane,
        }
    }

    fn items(listing: &ListingState) -> Vec<Line<'static>> {
        listing
            .visible_entries()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(entry_number(entry.id), Style::default().fg(TEXT_DIM)),
                    Span::raw(" "),
                    Span::raw(capitalize(&entry.name)),
                    Span::raw("  "),
                    Span::styled(
                        join_capitalized(&entry.type_names),
                        Style::default().fg(ACCENT_GOLD),
                    ),
                ])
            })
            .collect()
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: Some(TEXT_MAIN),
            },
            selection: SelectionStyle {
                style: Some(
                    Style::default()
                        .bg(BG_HIGHLIGHT)
                        .fg(TEXT_MAIN)
                        .add_modifier(Modifier::BOLD),
                ),
                marker: None,
                disabled: false,
            },
            ..SelectListStyle::default()
        }
    }

    fn search_line(listing: &ListingState) -> Line<'static> {
        let search = &listing.search;
        let query = if search.active {
            format!("/{}_", search.query)
        } else if search.query.is_empty() {
            "/ to search".to_string()
        } else {
            format!("/{}", search.query)
        };
        let style = if search.active {
            title_style()
        } else {
            Style::default().fg(TEXT_DIM)
        };
        Line::from(vec![Span::raw("Search: "), Span::styled(query, style)])
    }

    fn footer_line(listing: &ListingState) -> Line<'static> {
        let text = if listing.loading {
            "Loading...".to_string()
        } else if !listing.has_more {
            format!("End of catalog ({} entries)", listing.entries.len())
        } else {
            format!("{} loaded  m: more", listing.entries.len())
        };
        Line::styled(text, Style::default().fg(ACCENT_GOLD))
    }

    fn empty_text(listing: &ListingState) -> &'static str {
        if listing.loading {
            "Loading..."
        } else if listing.entries.is_empty() {
            "Nothing loaded yet."
        } else {
            "No loaded entries match."
        }
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, props: &ListingScreenProps<'_>) {
        let listing = &props.state.listing;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("CATALOG")
            .style(panel_style())
            .border_style(border_style(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(Self::search_line(listing)), rows[0]);

        let items = Self::items(listing);
        if items.is_empty() {
            frame.render_widget(
                Paragraph::new(Self::empty_text(listing))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                rows[1],
            );
        } else {
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: listing.selected_index.min(items.len().saturating_sub(1)),
                is_focused: props.is_focused,
                style: Self::list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: false,
                },
                on_select: Action::ListSelect,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, rows[1], list_props);
        }

        frame.render_widget(Paragraph::new(Self::footer_line(listing)), rows[2]);
    }

    fn render_preview(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("ENTRY")
            .style(panel_style())
            .border_style(border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(entry) = state.listing.selected_entry() else {
            self.preview.render(
                frame,
                inner,
                ImagePaneProps {
                    image: &state.image,
                },
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(inner);

        let image_label = if state.listing.show_alternate {
            "artwork"
        } else {
            "sprite"
        };
        let card = Text::from(vec![
            Line::from(vec![
                Span::styled(capitalize(&entry.name), title_style()),
                Span::raw("  "),
                Span::styled(entry_number(entry.id), Style::default().fg(TEXT_DIM)),
            ]),
            Line::styled(
                join_capitalized(&entry.type_names),
                Style::default().fg(ACCENT_GOLD),
            ),
            Line::styled(
                format!("a: toggle image ({image_label})"),
                Style::default().fg(TEXT_DIM),
            ),
        ]);
        frame.render_widget(Paragraph::new(card), rows[0]);
        self.preview.render(
            frame,
            rows[1],
            ImagePaneProps {
                image: &state.image,
            },
        );
    }
}

impl Component<Action> for ListingScreen {
    type Props<'a> = ListingScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let listing = &props.state.listing;

        match event {
            EventKind::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return match key.code {
                        KeyCode::Char('r') => vec![Action::ListReload],
                        _ => Vec::new(),
                    };
                }
                match key.code {
                    KeyCode::Enter => listing
                        .selected_entry()
                        .map(|entry| Action::DetailOpen(entry.id.to_string()))
                        .into_iter()
                        .collect(),
                    KeyCode::Char('a') => vec![Action::ListToggleImage],
                    KeyCode::Char('m') => vec![Action::ListLoadMore],
                    KeyCode::Char('/') => vec![Action::SearchStart],
                    KeyCode::PageDown => vec![Action::ListSelectionMove(PAGE_JUMP)],
                    KeyCode::PageUp => vec![Action::ListSelectionMove(-PAGE_JUMP)],
                    KeyCode::Home => vec![Action::ListJumpTop],
                    KeyCode::End => vec![Action::ListJumpBottom],
                    _ => {
                        let items = Self::items(listing);
                        let list_props = SelectListProps {
                            items: &items,
                            count: items.len(),
                            selected: listing.selected_index.min(items.len().saturating_sub(1)),
                            is_focused: true,
                            style: Self::list_style(),
                            behavior: SelectListBehavior {
                                show_scrollbar: true,
                                wrap_navigation: false,
                            },
                            on_select: Action::ListSelect,
                            render_item: &|item| item.clone(),
                        };
                        self.list.handle_event(event, list_props).into_iter().collect()
                    }
                }
            }
            EventKind::Scroll { delta, .. } => vec![Action::ListSelectionMove((*delta * 3) as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: ListingScreenProps<'_>) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.render_list(frame, columns[0], &props);
        self.render_preview(frame, columns[1], props.state);
    }
}

/// Keys while the search line is being edited.
pub fn handle_search_key(event: &EventKind) -> Vec<Action> {
    match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => Vec::new(),
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
