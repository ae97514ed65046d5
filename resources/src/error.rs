use std::path::PathBuf;

use thiserror::Error;

use crate::{PixelFormat, Rect};

/// Errors raised while acquiring or validating pixel resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The image file could not be read or decoded.
    #[error("failed to load image from {}", path.display())]
    Load {
        /// Location of the file that failed to load.
        path: PathBuf,
        /// Underlying decoder or I/O failure.
        #[source]
        source: image::ImageError,
    },
    /// The buffer could not be encoded to the requested file.
    #[error("failed to save image to {}", path.display())]
    Save {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying encoder or I/O failure.
        #[source]
        source: image::ImageError,
    },
    /// A buffer was requested with a zero or unaddressable side length.
    #[error("pixel buffer dimensions {width}x{height} are not allocatable")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Raw storage handed to a buffer does not match its declared shape.
    #[error("{width}x{height} {format:?} storage requires {expected} bytes, got {actual}")]
    StorageMismatch {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Declared pixel format.
        format: PixelFormat,
        /// Number of bytes implied by the declared shape.
        expected: usize,
        /// Number of bytes actually provided.
        actual: usize,
    },
    /// A view rectangle extends beyond the bounds of its buffer.
    #[error("region {region:?} exceeds buffer bounds {width}x{height}")]
    InvalidRegion {
        /// Rejected rectangle.
        region: Rect,
        /// Width of the referenced buffer.
        width: u32,
        /// Height of the referenced buffer.
        height: u32,
    },
}
