use std::collections::BTreeSet;

use log::{debug, warn};
use pazzers_core::{AssetId, Xy};
use pazzers_resources::{
    AssetCatalog, Canvas, DescriptorError, FieldDescriptor, PixelBuffer, PixelFormat,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Cell, Config, FieldError};

/// Field of tiles for a single game.
///
/// Cells live in one contiguous row-major vector, so the cell at `(x, y)` is
/// stored at `y * width + x`. The composite image of all tiles is rendered
/// once during construction and only read afterwards.
#[derive(Debug)]
pub struct Field {
    width: u32,
    height: u32,
    tile_size: u32,
    cells: Vec<Cell>,
    spawnable_positions: Vec<Xy>,
    image: PixelBuffer,
    rng: ChaCha8Rng,
}

impl Field {
    /// Builds a field from `descriptor`, resolving cell visuals in `assets`.
    pub fn new(
        descriptor: &FieldDescriptor,
        assets: &AssetCatalog,
        config: Config,
    ) -> Result<Self, FieldError> {
        descriptor.validate()?;
        let (columns, rows, step) = signed_extent(descriptor)?;

        let mut cells = Vec::with_capacity(descriptor.cells().len());
        let mut spawnable_positions = Vec::new();
        let positions = (0..rows).flat_map(|y| (0..columns).map(move |x| Xy::new(x, y)));
        for (position, entry) in positions.zip(descriptor.cells()) {
            let asset = assets
                .id(entry.asset())
                .ok_or_else(|| DescriptorError::MissingAsset {
                    asset: entry.asset().to_owned(),
                })?;
            if entry.spawnable() {
                spawnable_positions.push(position);
            }
            cells.push(Cell::new(position, entry.kind(), asset, entry.spawnable()));
        }

        let image = render_composite(descriptor, step, &cells, assets)?;
        debug!(
            "built {}x{} field with {} spawn positions ({}x{} px composite)",
            descriptor.width(),
            descriptor.height(),
            spawnable_positions.len(),
            image.width(),
            image.height()
        );

        Ok(Self {
            width: descriptor.width(),
            height: descriptor.height(),
            tile_size: descriptor.tile_size(),
            cells,
            spawnable_positions,
            image,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells, always `width * height`.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Edge length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Width of the rendered field in pixels.
    #[must_use]
    pub const fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the rendered field in pixels.
    #[must_use]
    pub const fn pixel_height(&self) -> u32 {
        self.image.height()
    }

    /// Cell at `position`, or `None` when the position lies outside the field.
    #[must_use]
    pub fn get_cell(&self, position: Xy) -> Option<&Cell> {
        let index = position.row_major_index(self.width, self.height)?;
        self.cells.get(index)
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Spawn-eligible coordinates in ascending row-major order.
    #[must_use]
    pub fn spawnable_positions(&self) -> &[Xy] {
        &self.spawnable_positions
    }

    /// Samples `count` distinct spawn positions using the field's seeded
    /// generator.
    pub fn get_spawn_positions(&mut self, count: usize) -> Result<Vec<Xy>, FieldError> {
        sample_positions(&self.spawnable_positions, count, &mut self.rng)
    }

    /// Samples `count` distinct spawn positions using a caller-provided
    /// generator.
    pub fn spawn_positions_with<R>(&self, count: usize, rng: &mut R) -> Result<Vec<Xy>, FieldError>
    where
        R: Rng + ?Sized,
    {
        sample_positions(&self.spawnable_positions, count, rng)
    }

    /// Pre-rendered image of every tile.
    #[must_use]
    pub const fn composite(&self) -> &PixelBuffer {
        &self.image
    }

    /// Blits the composite onto `target` with its top-left corner at `origin`.
    pub fn draw<C>(&self, target: &mut C, origin: Xy)
    where
        C: Canvas + ?Sized,
    {
        target.blit_view(self.image.full_view(), origin.x, origin.y);
    }
}

fn sample_positions<R>(positions: &[Xy], count: usize, rng: &mut R) -> Result<Vec<Xy>, FieldError>
where
    R: Rng + ?Sized,
{
    if count > positions.len() {
        return Err(FieldError::InsufficientSpawnCapacity {
            requested: count,
            available: positions.len(),
        });
    }
    Ok(positions.choose_multiple(rng, count).copied().collect())
}

/// Columns, rows and tile edge length as signed pixel-space values.
fn signed_extent(descriptor: &FieldDescriptor) -> Result<(i32, i32, i32), DescriptorError> {
    match (
        i32::try_from(descriptor.width()),
        i32::try_from(descriptor.height()),
        i32::try_from(descriptor.tile_size()),
    ) {
        (Ok(columns), Ok(rows), Ok(step)) => Ok((columns, rows, step)),
        _ => Err(DescriptorError::ExtentOverflow {
            width: descriptor.width(),
            height: descriptor.height(),
            tile_size: descriptor.tile_size(),
        }),
    }
}

fn render_composite(
    descriptor: &FieldDescriptor,
    step: i32,
    cells: &[Cell],
    assets: &AssetCatalog,
) -> Result<PixelBuffer, FieldError> {
    let tile_size = descriptor.tile_size();
    let mut image = PixelBuffer::blank(
        descriptor.width() * tile_size,
        descriptor.height() * tile_size,
        PixelFormat::Rgba8,
    )?;

    let mut used = BTreeSet::new();
    for cell in cells {
        let Some(asset) = assets.get(cell.asset()) else {
            continue;
        };
        let offset = cell.position().scaled(step);
        image.blit(asset, offset.x, offset.y);
        let _ = used.insert(cell.asset());
    }

    for id in used {
        warn_if_oversized(id, assets, tile_size);
    }
    Ok(image)
}

fn warn_if_oversized(id: AssetId, assets: &AssetCatalog, tile_size: u32) {
    if let Some(asset) = assets.get(id) {
        if asset.width() > tile_size || asset.height() > tile_size {
            warn!(
                "asset {} is {}x{} px and overlaps neighbouring {tile_size}px tiles",
                id.get(),
                asset.width(),
                asset.height()
            );
        }
    }
}
