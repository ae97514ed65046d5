#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative field state for a Pazzers game.
//!
//! A [`Field`] is built once from a [`FieldDescriptor`](pazzers_resources::FieldDescriptor)
//! and an [`AssetCatalog`](pazzers_resources::AssetCatalog). It owns one
//! [`Cell`] per grid coordinate, the ordered list of spawn-eligible
//! coordinates, and a pre-rendered composite of every tile that is blitted
//! onto a destination canvas each frame.

mod cell;
mod field;

pub use cell::Cell;
pub use field::Field;

use pazzers_resources::{DescriptorError, ResourceError};
use thiserror::Error;

const DEFAULT_RNG_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Configuration parameters required to construct a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn sampling seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed of the generator used by [`Field::get_spawn_positions`].
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

/// Errors reported by field construction and spawn sampling.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The descriptor is malformed or references unknown assets.
    #[error("invalid field descriptor")]
    InvalidDescriptor(#[from] DescriptorError),
    /// More spawn positions were requested than the field provides.
    #[error("requested {requested} spawn positions but only {available} are available")]
    InsufficientSpawnCapacity {
        /// Number of positions requested.
        requested: usize,
        /// Number of spawn-eligible coordinates in the field.
        available: usize,
    },
    /// The composite surface could not be allocated.
    #[error("failed to allocate the field composite")]
    Composite(#[from] ResourceError),
}
