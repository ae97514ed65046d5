use std::path::Path;

use image::{ColorType, DynamicImage};
use log::trace;

use crate::{BufferView, BufferViewMut, Canvas, Rect, ResourceError};

/// Channel layout of the bytes stored in a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Four bytes per pixel: red, green, blue and alpha.
    Rgba8,
    /// Three bytes per pixel: red, green and blue.
    Rgb8,
}

impl PixelFormat {
    /// Number of bytes occupied by a single pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Rgb8 => 3,
        }
    }

    fn color_type(self) -> ColorType {
        match self {
            Self::Rgba8 => ColorType::Rgba8,
            Self::Rgb8 => ColorType::Rgb8,
        }
    }
}

/// Owned rectangular surface of pixel data.
///
/// The storage always holds exactly `width * height * bytes_per_pixel` bytes
/// laid out row by row, and both sides are strictly positive. Cloning a
/// buffer duplicates its storage, so the copy and the original never alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    color_key: Option<[u8; 3]>,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Loads and decodes the image stored at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ResourceError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        trace!("decoded {} as {:?}", path.display(), decoded.color());
        Self::adopt(decoded)
    }

    /// Takes ownership of an already decoded image.
    ///
    /// Images carrying an alpha channel are stored as [`PixelFormat::Rgba8`],
    /// everything else as [`PixelFormat::Rgb8`].
    pub fn adopt(surface: DynamicImage) -> Result<Self, ResourceError> {
        if surface.color().has_alpha() {
            let rgba = surface.into_rgba8();
            let (width, height) = rgba.dimensions();
            Self::from_raw(width, height, PixelFormat::Rgba8, rgba.into_raw())
        } else {
            let rgb = surface.into_rgb8();
            let (width, height) = rgb.dimensions();
            Self::from_raw(width, height, PixelFormat::Rgb8, rgb.into_raw())
        }
    }

    /// Wraps raw row-major pixel bytes.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, ResourceError> {
        let expected = storage_len(width, height, format)?;
        if pixels.len() != expected {
            return Err(ResourceError::StorageMismatch {
                width,
                height,
                format,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            color_key: None,
            pixels,
        })
    }

    /// Allocates a zero-filled buffer, fully transparent for [`PixelFormat::Rgba8`].
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Result<Self, ResourceError> {
        let len = storage_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            color_key: None,
            pixels: vec![0; len],
        })
    }

    /// Width of the buffer in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the buffer in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout of the stored pixels.
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// RGB value treated as transparent when this buffer is a blit source.
    #[must_use]
    pub const fn color_key(&self) -> Option<[u8; 3]> {
        self.color_key
    }

    /// Sets or clears the transparent color key.
    pub fn set_color_key(&mut self, color_key: Option<[u8; 3]>) {
        self.color_key = color_key;
    }

    /// Raw row-major storage.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Channel bytes of the pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let range = self.byte_range(x, y)?;
        self.pixels.get(range)
    }

    /// View covering the whole buffer.
    #[must_use]
    pub fn full_view(&self) -> BufferView<'_> {
        BufferView::full(self)
    }

    /// View restricted to `region`.
    pub fn view(&self, region: Rect) -> Result<BufferView<'_>, ResourceError> {
        BufferView::new(self, region)
    }

    /// Writable view restricted to `region`.
    pub fn view_mut(&mut self, region: Rect) -> Result<BufferViewMut<'_>, ResourceError> {
        BufferViewMut::new(self, region)
    }

    /// Composites `source` onto this buffer with its top-left corner at `(x, y)`.
    ///
    /// Source pixels landing outside this buffer are dropped. Pixels with zero
    /// alpha, or whose RGB matches the source buffer's color key, are skipped;
    /// every other pixel overwrites the destination.
    pub fn blit<'s>(&mut self, source: impl Into<BufferView<'s>>, x: i32, y: i32) {
        let source = source.into();
        let region = source.rect();
        let origin_x = i64::from(x);
        let origin_y = i64::from(y);

        let left = origin_x.max(0);
        let top = origin_y.max(0);
        let right = (origin_x + i64::from(region.width)).min(i64::from(self.width));
        let bottom = (origin_y + i64::from(region.height)).min(i64::from(self.height));
        if left >= right || top >= bottom {
            return;
        }

        let (Ok(left), Ok(top), Ok(right), Ok(bottom)) = (
            u32::try_from(left),
            u32::try_from(top),
            u32::try_from(right),
            u32::try_from(bottom),
        ) else {
            return;
        };
        let (Ok(source_left), Ok(source_top)) = (
            u32::try_from(i64::from(region.x) + i64::from(left) - origin_x),
            u32::try_from(i64::from(region.y) + i64::from(top) - origin_y),
        ) else {
            return;
        };

        let source_buffer = source.buffer();
        for row in 0..bottom - top {
            for column in 0..right - left {
                let Some(channels) = source_buffer.pixel(source_left + column, source_top + row)
                else {
                    continue;
                };
                if source_buffer.is_transparent(channels) {
                    continue;
                }
                let rgba = to_rgba(channels, source_buffer.format);
                let Some(range) = self.byte_range(left + column, top + row) else {
                    continue;
                };
                if let Some(destination) = self.pixels.get_mut(range) {
                    write_rgba(destination, self.format, rgba);
                }
            }
        }
    }

    /// Invokes `f(x, y, channels)` once for every pixel in row-major order.
    ///
    /// `channels` borrows exactly the bytes of that pixel, so the callback may
    /// rewrite the pixel in place.
    pub fn filter<F>(&mut self, mut f: F)
    where
        F: FnMut(u32, u32, &mut [u8]),
    {
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let row_len = self.row_len();
        for (y, row) in self.pixels.chunks_exact_mut(row_len).enumerate() {
            for (x, channels) in row.chunks_exact_mut(bytes_per_pixel).enumerate() {
                f(x as u32, y as u32, channels);
            }
        }
    }

    /// Encodes the buffer to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ResourceError> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            self.format.color_type(),
        )
        .map_err(|source| ResourceError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    fn is_transparent(&self, channels: &[u8]) -> bool {
        if self.format == PixelFormat::Rgba8 && channels.get(3) == Some(&0) {
            return true;
        }
        self.color_key
            .is_some_and(|key| channels.get(..3) == Some(&key[..]))
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    fn byte_range(&self, x: u32, y: u32) -> Option<std::ops::Range<usize>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let start = y as usize * self.row_len() + x as usize * bytes_per_pixel;
        Some(start..start + bytes_per_pixel)
    }
}

impl Canvas for PixelBuffer {
    fn blit_view(&mut self, source: BufferView<'_>, x: i32, y: i32) {
        self.blit(source, x, y);
    }
}

fn storage_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, ResourceError> {
    if width == 0 || height == 0 {
        return Err(ResourceError::InvalidDimensions { width, height });
    }
    usize::try_from(u64::from(width) * u64::from(height))
        .ok()
        .and_then(|count| count.checked_mul(format.bytes_per_pixel()))
        .ok_or(ResourceError::InvalidDimensions { width, height })
}

fn to_rgba(channels: &[u8], format: PixelFormat) -> [u8; 4] {
    match (format, channels) {
        (PixelFormat::Rgba8, &[red, green, blue, alpha]) => [red, green, blue, alpha],
        (PixelFormat::Rgb8, &[red, green, blue]) => [red, green, blue, u8::MAX],
        _ => [0; 4],
    }
}

fn write_rgba(destination: &mut [u8], format: PixelFormat, rgba: [u8; 4]) {
    match format {
        PixelFormat::Rgba8 => destination.copy_from_slice(&rgba),
        PixelFormat::Rgb8 => destination.copy_from_slice(&rgba[..3]),
    }
}
