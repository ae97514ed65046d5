#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pixel surfaces, views and field descriptors used by the Pazzers renderer.
//!
//! [`PixelBuffer`] owns decoded pixel storage and implements the compositing
//! primitives (blit, clone, per-pixel filter). [`BufferView`] and
//! [`BufferViewMut`] borrow a buffer and restrict it to a rectangular region
//! without copying. [`FieldDescriptor`] is the static description of a field
//! and [`AssetCatalog`] resolves the descriptor's named assets into loaded
//! buffers.

mod assets;
mod buffer;
mod descriptor;
mod error;
mod view;

pub use assets::AssetCatalog;
pub use buffer::{PixelBuffer, PixelFormat};
pub use descriptor::{
    AssetSource, CellDescriptor, DescriptorError, FieldDescriptor, MAX_COMPOSITE_BYTES,
};
pub use error::ResourceError;
pub use view::{BufferView, BufferViewMut, Canvas, Rect};
