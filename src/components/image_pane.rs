use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::theme::TEXT_DIM;
use super::Component;
use crate::action::Action;
use crate::sprite;
use crate::sprite_backend;
use crate::state::ImageState;

const UNAVAILABLE_TEXT: &str = "[image unavailable]";

pub struct ImagePaneProps<'a> {
    pub image: &'a ImageState,
}

/// Draws the one on-screen image, or a text placeholder when there is none.
#[derive(Default)]
pub struct ImagePane;

impl ImagePane {
    pub fn placeholder(image: &ImageState) -> &'static str {
        if image.url.is_none() {
            "[no image]"
        } else if image.loading {
            "[loading image]"
        } else if image.failed {
            UNAVAILABLE_TEXT
        } else {
            ""
        }
    }
}

impl Component<Action> for ImagePane {
    type Props<'a> = ImagePaneProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: ImagePaneProps<'_>) {
        let mut text = Self::placeholder(props.image);
        if let Some(sprite) = props.image.sprite.as_ref() {
            let (cols, rows) = sprite::sprite_fit(sprite, area.width, area.height);
            match sprite::kitty_sequence(sprite, cols, rows) {
                Ok(sequence) => {
                    let offset_x = area.x.saturating_add(area.width.saturating_sub(cols) / 2);
                    let offset_y = area.y.saturating_add(area.height.saturating_sub(rows) / 2);
                    sprite_backend::update_sprite(offset_x, offset_y, sequence);
                    return;
                }
                Err(err) => {
                    tracing::warn!(%err, "sprite encode failed");
                    text = UNAVAILABLE_TEXT;
                }
            }
        }

        sprite_backend::clear_sprites();
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::SpriteData;
    use tui_dispatch::testing::*;

    #[test]
    fn placeholder_reflects_image_slot() {
        let mut image = ImageState::default();
        assert_eq!(ImagePane::placeholder(&image), "[no image]");

        image.url = Some("https://img.example/1.png".into());
        image.loading = true;
        assert_eq!(ImagePane::placeholder(&image), "[loading image]");

        image.loading = false;
        image.failed = true;
        assert_eq!(ImagePane::placeholder(&image), "[image unavailable]");
    }

    #[test]
    fn unencodable_sprite_falls_back_to_placeholder() {
        // Chunk boundary lands inside a multi-byte char, so encoding fails.
        let image = ImageState {
            url: Some("https://img.example/1.png".into()),
            sprite: Some(SpriteData {
                payload: format!("A{}", "é".repeat(3000)),
                width: 96,
                height: 96,
            }),
            loading: false,
            failed: false,
        };
        let mut pane = ImagePane;
        let mut render = RenderHarness::new(40, 10);

        let output = render.render_to_string_plain(|frame| {
            pane.render(frame, frame.area(), ImagePaneProps { image: &image });
        });

        assert!(output.contains(UNAVAILABLE_TEXT));
    }
}
