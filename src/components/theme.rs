use ratatui::style::{Color, Modifier, Style};

pub const BG_BASE: Color = Color::Rgb(10, 20, 14);
pub const BG_PANEL: Color = Color::Rgb(18, 34, 24);
pub const BG_HIGHLIGHT: Color = Color::Rgb(34, 96, 58);
pub const TEXT_MAIN: Color = Color::Rgb(226, 242, 230);
pub const TEXT_DIM: Color = Color::Rgb(160, 190, 170);
pub const ACCENT_GREEN: Color = Color::Rgb(96, 210, 120);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

pub fn title_style() -> Style {
    Style::default()
        .fg(ACCENT_GREEN)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_style() -> Style {
    Style::default().bg(BG_PANEL).fg(TEXT_MAIN)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        title_style()
    } else {
        Style::default().fg(TEXT_DIM)
    }
}
