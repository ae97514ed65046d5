//! Offline scene composition used by the command-line renderer.

use anyhow::{anyhow, Context, Result};
use pazzers_core::Xy;
use pazzers_game::Field;
use pazzers_resources::{PixelBuffer, PixelFormat, Rect};

const BACKGROUND: [u8; 4] = [0x18, 0x18, 0x20, 0xff];
const MARKER: [u8; 4] = [0xf0, 0xc0, 0x20, 0xff];

/// Presentation switches applied on top of the field composite.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RenderOptions {
    /// Border in pixels around the field.
    pub(crate) margin: u32,
    /// Whether the final image is converted to grayscale.
    pub(crate) grayscale: bool,
}

/// Draws `field` onto a fresh canvas and marks every spawn position.
pub(crate) fn render(field: &Field, spawns: &[Xy], options: RenderOptions) -> Result<PixelBuffer> {
    let border = options
        .margin
        .checked_mul(2)
        .ok_or_else(|| anyhow!("margin {} is too large", options.margin))?;
    let width = field
        .pixel_width()
        .checked_add(border)
        .ok_or_else(|| anyhow!("canvas width overflows"))?;
    let height = field
        .pixel_height()
        .checked_add(border)
        .ok_or_else(|| anyhow!("canvas height overflows"))?;

    let mut canvas = PixelBuffer::blank(width, height, PixelFormat::Rgba8)
        .context("failed to allocate canvas")?;
    canvas.filter(|_, _, channels| channels.copy_from_slice(&BACKGROUND));

    let inset = i32::try_from(options.margin).context("margin exceeds pixel range")?;
    field.draw(&mut canvas, Xy::new(inset, inset));

    if !spawns.is_empty() {
        let marker = spawn_marker(field.tile_size())?;
        let step = i32::try_from(field.tile_size()).context("tile size exceeds pixel range")?;
        let mut viewport = canvas
            .view_mut(Rect::new(
                options.margin,
                options.margin,
                field.pixel_width(),
                field.pixel_height(),
            ))
            .context("field does not fit the canvas")?;
        for spawn in spawns {
            let offset = spawn.scaled(step);
            viewport.blit(&marker, offset.x, offset.y);
        }
    }

    if options.grayscale {
        canvas.filter(|_, _, channels| {
            let luma = (u32::from(channels[0]) * 299
                + u32::from(channels[1]) * 587
                + u32::from(channels[2]) * 114)
                / 1000;
            let luma = u8::try_from(luma).unwrap_or(u8::MAX);
            channels[..3].fill(luma);
        });
    }

    Ok(canvas)
}

/// Diamond-shaped marker filling one tile; pixels outside the diamond stay
/// transparent so the tile underneath shows through.
fn spawn_marker(tile_size: u32) -> Result<PixelBuffer> {
    let mut marker = PixelBuffer::blank(tile_size, tile_size, PixelFormat::Rgba8)
        .context("failed to allocate spawn marker")?;
    let centre = i64::from(tile_size) - 1;
    let radius = i64::from(tile_size) / 2;
    marker.filter(|x, y, channels| {
        let distance = (2 * i64::from(x) - centre).abs() + (2 * i64::from(y) - centre).abs();
        if distance <= radius * 2 {
            channels.copy_from_slice(&MARKER);
        }
    });
    Ok(marker)
}
