#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pazzers crates.
//!
//! This crate defines the small value types that connect the resource layer,
//! the authoritative field, and adapters. Coordinates are expressed with
//! [`Xy`], which is signed so that callers may query positions outside a
//! field or draw partially off-screen without prior clamping. Visual assets
//! are referenced through opaque [`AssetId`] handles handed out by the asset
//! catalog.

use serde::{Deserialize, Serialize};

/// Signed two-dimensional coordinate used for both grid cells and pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Xy {
    /// Horizontal component, growing to the right.
    pub x: i32,
    /// Vertical component, growing downwards.
    pub y: i32,
}

impl Xy {
    /// Origin of every coordinate space.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new coordinate from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate translated by the provided offset.
    #[must_use]
    pub const fn offset_by(self, offset: Xy) -> Self {
        Self::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
        )
    }

    /// Returns the coordinate with both components multiplied by `factor`.
    #[must_use]
    pub const fn scaled(self, factor: i32) -> Self {
        Self::new(self.x.saturating_mul(factor), self.y.saturating_mul(factor))
    }

    /// Computes the row-major index of the coordinate inside a `width` by
    /// `height` rectangle anchored at the origin.
    ///
    /// Returns `None` when the coordinate falls outside the rectangle.
    #[must_use]
    pub fn row_major_index(self, width: u32, height: u32) -> Option<usize> {
        let column = u32::try_from(self.x).ok()?;
        let row = u32::try_from(self.y).ok()?;
        if column >= width || row >= height {
            return None;
        }
        let width = usize::try_from(width).ok()?;
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl From<(i32, i32)> for Xy {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Opaque handle referencing a visual asset stored in an asset catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(u32);

impl AssetId {
    /// Creates a new asset identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}
