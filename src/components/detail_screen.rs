use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tui_dispatch::{DataResource, EventKind};

use super::format::{
    capitalize, entry_number, format_height, format_weight, join_capitalized, stat_bar,
};
use super::theme::{border_style, panel_style, title_style, ACCENT_GOLD, TEXT_DIM, TEXT_MAIN};
use super::{Component, ImagePane, ImagePaneProps};
use crate::action::Action;
use crate::sprite_backend;
use crate::state::{AppState, BaseStat, CatalogEntryDetail};

pub const NOT_FOUND_TEXT: &str = "Pokemon not found";
const STAT_BAR_WIDTH: u16 = 20;

pub struct DetailScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// One entry's full record: artwork, profile, base stats and moves.
#[derive(Default)]
pub struct DetailScreen {
    artwork: ImagePane,
}

impl DetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn profile_text(detail: &CatalogEntryDetail) -> Text<'static> {
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<10}"), Style::default().fg(TEXT_DIM)),
                Span::styled(value, Style::default().fg(TEXT_MAIN)),
            ])
        };
        Text::from(vec![
            row("Type", join_capitalized(&detail.types)),
            row("Abilities", join_capitalized(&detail.abilities)),
            row("Height", format_height(detail.height_decimetres)),
            row("Weight", format_weight(detail.weight_decagrams)),
        ])
    }

    fn stat_line(stat: &BaseStat) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{:<16}", capitalize(&stat.name)),
                Style::default().fg(TEXT_DIM),
            ),
            Span::styled(
                format!("{:>3} ", stat.base_value),
                Style::default().fg(TEXT_MAIN),
            ),
            Span::styled(
                stat_bar(stat.base_value, STAT_BAR_WIDTH),
                Style::default().fg(ACCENT_GOLD),
            ),
        ])
    }

    fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        let paragraph = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, area);
    }

    fn render_loaded(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        detail: &CatalogEntryDetail,
    ) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        let title = Line::from(vec![
            Span::styled(capitalize(&detail.name), title_style()),
            Span::raw("  "),
            Span::styled(entry_number(detail.id), Style::default().fg(TEXT_DIM)),
        ]);
        frame.render_widget(Paragraph::new(title), rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(45),
                Constraint::Percentage(25),
            ])
            .split(rows[1]);

        self.artwork.render(
            frame,
            columns[0],
            ImagePaneProps {
                image: &state.image,
            },
        );

        let info = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(3)])
            .split(columns[1]);

        frame.render_widget(
            Paragraph::new(Self::profile_text(detail))
                .block(Block::default().borders(Borders::ALL).title("PROFILE"))
                .wrap(Wrap { trim: true }),
            info[0],
        );

        let stats: Vec<Line<'static>> = detail.stats.iter().map(Self::stat_line).collect();
        frame.render_widget(
            Paragraph::new(Text::from(stats))
                .block(Block::default().borders(Borders::ALL).title("BASE STATS")),
            info[1],
        );

        let moves: Vec<Line<'static>> = detail
            .visible_moves()
            .iter()
            .map(|name| Line::from(capitalize(name)))
            .collect();
        frame.render_widget(
            Paragraph::new(Text::from(moves))
                .block(Block::default().borders(Borders::ALL).title("MOVES")),
            columns[2],
        );
    }
}

impl Component<Action> for DetailScreen {
    type Props<'a> = DetailScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                    Some(Action::NavigateBack)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DetailScreenProps<'_>) {
        let state = props.state;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("DETAIL")
            .style(panel_style())
            .border_style(border_style(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &state.detail.record {
            DataResource::Loaded(detail) => self.render_loaded(frame, inner, state, detail),
            DataResource::Failed(_) => {
                sprite_backend::clear_sprites();
                Self::render_message(
                    frame,
                    inner,
                    vec![
                        Line::styled(NOT_FOUND_TEXT, title_style()),
                        Line::from(format!("No entry for \"{}\"", state.detail.id)),
                        Line::from("Esc: back to the catalog"),
                    ],
                );
            }
            DataResource::Empty | DataResource::Loading => {
                sprite_backend::clear_sprites();
                Self::render_message(frame, inner, vec![Line::from("Loading...")]);
            }
        }
    }
}
