//! Crossterm backend that overlays the current kitty image after each draw.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::{cursor::MoveTo, queue, style::Print};
use ratatui::backend::{Backend, ClearType, CrosstermBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};

use crate::sprite::IMAGE_ID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub data: String,
}

#[derive(Default, Debug, Clone)]
pub struct SpriteRegistry {
    current: Option<Placement>,
}

impl SpriteRegistry {
    pub fn set(&mut self, x: u16, y: u16, data: String) {
        self.current = Some(Placement { x, y, data });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<Placement> {
        self.current.clone()
    }
}

static REGISTRY: OnceLock<Arc<Mutex<SpriteRegistry>>> = OnceLock::new();

pub fn sprite_registry() -> Arc<Mutex<SpriteRegistry>> {
    REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(SpriteRegistry::default())))
        .clone()
}

pub fn update_sprite(x: u16, y: u16, data: String) {
    if let Ok(mut registry) = sprite_registry().lock() {
        registry.set(x, y, data);
    }
}

pub fn clear_sprites() {
    if let Ok(mut registry) = sprite_registry().lock() {
        registry.clear();
    }
}

#[derive(Debug, Clone)]
pub struct SpriteBackend<W: Write> {
    inner: CrosstermBackend<W>,
    registry: Arc<Mutex<SpriteRegistry>>,
    drawn: Option<Placement>,
}

impl<W: Write> SpriteBackend<W> {
    pub fn new(writer: W, registry: Arc<Mutex<SpriteRegistry>>) -> Self {
        Self {
            inner: CrosstermBackend::new(writer),
            registry,
            drawn: None,
        }
    }
}

impl<W: Write> Backend for SpriteBackend<W> {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)?;
        let wanted = self
            .registry
            .lock()
            .map(|registry| registry.current())
            .unwrap_or(None);
        if wanted == self.drawn {
            return Ok(());
        }
        if self.drawn.is_some() {
            queue!(
                self.inner,
                Print(format!("\x1b_Ga=d,d=i,i={IMAGE_ID},q=2\x1b\\"))
            )?;
        }
        if let Some(placement) = &wanted {
            queue!(
                self.inner,
                MoveTo(placement.x, placement.y),
                Print(&placement.data)
            )?;
        }
        self.drawn = wanted;
        Ok(())
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.inner.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.inner.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.drawn = None;
        queue!(
            self.inner,
            Print(format!("\x1b_Ga=d,d=i,i={IMAGE_ID},q=2\x1b\\"))
        )?;
        self.inner.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.inner.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.inner.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

impl<W: Write> Write for SpriteBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}
