use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const KITTY_CHUNK: usize = 4096;
/// Kitty image id used for the single on-screen image.
pub const IMAGE_ID: u32 = 1;

/// A PNG ready for the kitty graphics protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub payload: String,
    pub width: u32,
    pub height: u32,
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (width, height) = image.dimensions();
    let payload = if bytes.starts_with(PNG_MAGIC) {
        general_purpose::STANDARD.encode(bytes)
    } else {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|err| err.to_string())?;
        general_purpose::STANDARD.encode(&buf)
    };
    Ok(SpriteData {
        payload,
        width,
        height,
    })
}

pub fn kitty_sequence(sprite: &SpriteData, cols: u16, rows: u16) -> Result<String, String> {
    let mut sequences = String::new();
    let payload = sprite.payload.as_bytes();
    let total_chunks = payload.len().div_ceil(KITTY_CHUNK);

    for (index, chunk) in payload.chunks(KITTY_CHUNK).enumerate() {
        let more = u8::from(index + 1 < total_chunks);
        let chunk_str = std::str::from_utf8(chunk).map_err(|err| err.to_string())?;
        if index == 0 {
            let mut params = format!(
                "f=100,s={},v={},a=T,t=d,i={IMAGE_ID},q=2",
                sprite.width, sprite.height
            );
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            sequences.push_str(&format!("\x1b_G{params},m={more};{chunk_str}\x1b\\"));
        } else {
            sequences.push_str(&format!("\x1b_Gm={more};{chunk_str}\x1b\\"));
        }
    }
    Ok(sequences)
}

/// Largest cell box that keeps the image aspect ratio (cells are ~2:1).
pub fn sprite_fit(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> (u16, u16) {
    const CELL_ASPECT: f32 = 2.0;
    if max_cols == 0 || max_rows == 0 || sprite.height == 0 {
        return (max_cols, max_rows);
    }
    let image_ratio = sprite.width as f32 / sprite.height as f32;
    let cols_for_max_rows = image_ratio * max_rows as f32 * CELL_ASPECT;
    if cols_for_max_rows <= max_cols as f32 {
        let cols = cols_for_max_rows.max(1.0).round() as u16;
        return (cols.max(1), max_rows);
    }
    let rows_for_max_cols = max_cols as f32 / (image_ratio * CELL_ASPECT);
    let rows = rows_for_max_cols.max(1.0).round() as u16;
    (max_cols, rows.clamp(1, max_rows))
}
