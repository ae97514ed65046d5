use crate::{PixelBuffer, ResourceError};

/// Axis-aligned rectangle expressed in buffer pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge of the rectangle.
    pub x: u32,
    /// Top edge of the rectangle.
    pub y: u32,
    /// Horizontal extent in pixels.
    pub width: u32,
    /// Vertical extent in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle lies inside a `width` by `height` surface.
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(right), Some(bottom)) if right <= width && bottom <= height)
    }
}

/// Destination of blit operations.
pub trait Canvas {
    /// Composites `source` with its top-left corner at `(x, y)` in the
    /// canvas's own coordinate space.
    fn blit_view(&mut self, source: BufferView<'_>, x: i32, y: i32);
}

/// Read-only rectangular window into a [`PixelBuffer`].
///
/// The view never copies pixels; it only narrows which part of the buffer is
/// used as a blit source.
#[derive(Clone, Copy, Debug)]
pub struct BufferView<'a> {
    buffer: &'a PixelBuffer,
    rect: Rect,
}

impl<'a> BufferView<'a> {
    /// Creates a view over `region` of `buffer`.
    pub fn new(buffer: &'a PixelBuffer, region: Rect) -> Result<Self, ResourceError> {
        validate(region, buffer)?;
        Ok(Self {
            buffer,
            rect: region,
        })
    }

    /// View covering the whole of `buffer`.
    #[must_use]
    pub fn full(buffer: &'a PixelBuffer) -> Self {
        Self {
            buffer,
            rect: Rect::new(0, 0, buffer.width(), buffer.height()),
        }
    }

    /// Width of the view, not of the underlying buffer.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.rect.width
    }

    /// Height of the view, not of the underlying buffer.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.rect.height
    }

    /// Region of the buffer covered by the view.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Buffer the view borrows from.
    #[must_use]
    pub const fn buffer(&self) -> &'a PixelBuffer {
        self.buffer
    }

    /// Channel bytes at `(x, y)` relative to the view's origin.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&'a [u8]> {
        if x >= self.rect.width || y >= self.rect.height {
            return None;
        }
        self.buffer.pixel(self.rect.x + x, self.rect.y + y)
    }
}

impl<'a> From<&'a PixelBuffer> for BufferView<'a> {
    fn from(buffer: &'a PixelBuffer) -> Self {
        Self::full(buffer)
    }
}

/// Writable rectangular window into a [`PixelBuffer`].
///
/// Blit offsets are relative to the view's origin. Clipping is performed
/// against the underlying buffer, matching [`PixelBuffer::blit`].
#[derive(Debug)]
pub struct BufferViewMut<'a> {
    buffer: &'a mut PixelBuffer,
    rect: Rect,
}

impl<'a> BufferViewMut<'a> {
    /// Creates a writable view over `region` of `buffer`.
    pub fn new(buffer: &'a mut PixelBuffer, region: Rect) -> Result<Self, ResourceError> {
        validate(region, buffer)?;
        Ok(Self {
            buffer,
            rect: region,
        })
    }

    /// Writable view covering the whole of `buffer`.
    #[must_use]
    pub fn full(buffer: &'a mut PixelBuffer) -> Self {
        let rect = Rect::new(0, 0, buffer.width(), buffer.height());
        Self { buffer, rect }
    }

    /// Width of the view, not of the underlying buffer.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.rect.width
    }

    /// Height of the view, not of the underlying buffer.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.rect.height
    }

    /// Region of the buffer covered by the view.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Read-only view of the same region.
    #[must_use]
    pub fn as_view(&self) -> BufferView<'_> {
        BufferView {
            buffer: &*self.buffer,
            rect: self.rect,
        }
    }

    /// Composites `source` at `(x, y)` relative to the view's origin.
    pub fn blit<'s>(&mut self, source: impl Into<BufferView<'s>>, x: i32, y: i32) {
        let x = x.saturating_add(saturating_i32(self.rect.x));
        let y = y.saturating_add(saturating_i32(self.rect.y));
        self.buffer.blit(source, x, y);
    }
}

impl Canvas for BufferViewMut<'_> {
    fn blit_view(&mut self, source: BufferView<'_>, x: i32, y: i32) {
        self.blit(source, x, y);
    }
}

fn validate(region: Rect, buffer: &PixelBuffer) -> Result<(), ResourceError> {
    if region.fits_within(buffer.width(), buffer.height()) {
        Ok(())
    } else {
        Err(ResourceError::InvalidRegion {
            region,
            width: buffer.width(),
            height: buffer.height(),
        })
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_within_accepts_touching_edges() {
        assert!(Rect::new(0, 0, 4, 4).fits_within(4, 4));
        assert!(Rect::new(2, 1, 2, 3).fits_within(4, 4));
        assert!(!Rect::new(3, 0, 2, 1).fits_within(4, 4));
        assert!(!Rect::new(0, 4, 1, 1).fits_within(4, 4));
    }

    #[test]
    fn fits_within_rejects_overflowing_extents() {
        assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(u32::MAX, 1));
    }
}
