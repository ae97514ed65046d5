use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use pazzers_core::Xy;
use serde::Deserialize;
use thiserror::Error;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Largest composite, in bytes of Rgba8 storage, a descriptor may describe.
pub const MAX_COMPOSITE_BYTES: u64 = 1 << 30;

/// Problems detected while reading or validating a field descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor file could not be read.
    #[error("failed to read field descriptor at {}", path.display())]
    Read {
        /// Location of the descriptor.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The descriptor is not valid TOML or misses required keys.
    #[error("failed to parse field descriptor")]
    Parse(#[from] toml::de::Error),
    /// The descriptor declares a manifest version this crate does not read.
    #[error("unsupported field descriptor version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version declared by the descriptor.
        found: u32,
        /// Version understood by this crate.
        expected: u32,
    },
    /// The layout has no rows, or its first row has no cells.
    #[error("field descriptor layout is empty")]
    EmptyLayout,
    /// A tile table key is not exactly one character.
    #[error("tile key `{key}` must be a single character")]
    InvalidSymbol {
        /// Offending key.
        key: String,
    },
    /// A layout row is longer or shorter than the first row.
    #[error("layout row {row} has {found} cells; expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells in the first row.
        expected: usize,
        /// Number of cells in the offending row.
        found: usize,
    },
    /// The layout uses a symbol missing from the tile table.
    #[error("unknown tile symbol `{symbol}` at ({}, {})", position.x, position.y)]
    UnknownSymbol {
        /// Symbol found in the layout.
        symbol: char,
        /// Coordinate of the symbol.
        position: Xy,
    },
    /// A tile refers to an asset absent from the asset table.
    #[error("tile `{symbol}` refers to unknown asset `{asset}`")]
    UnknownAsset {
        /// Tile symbol declaring the reference.
        symbol: char,
        /// Name of the missing asset.
        asset: String,
    },
    /// The field has a zero or unrepresentable side.
    #[error("field dimensions {width}x{height} must both be positive")]
    InvalidDimensions {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
    },
    /// Tiles must span at least one pixel.
    #[error("tile size must be positive")]
    ZeroTileSize,
    /// The rendered field would not be addressable in pixel coordinates, or
    /// its composite would exceed [`MAX_COMPOSITE_BYTES`].
    #[error("field of {width}x{height} tiles at {tile_size}px exceeds the addressable pixel range")]
    ExtentOverflow {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
        /// Edge length of a tile in pixels.
        tile_size: u32,
    },
    /// The number of cell entries disagrees with the declared dimensions.
    #[error("descriptor lists {found} cells; expected {expected}")]
    CellCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Number of cells actually present.
        found: usize,
    },
    /// A cell references an asset that was never loaded.
    #[error("asset `{asset}` is not present in the asset catalog")]
    MissingAsset {
        /// Name of the missing asset.
        asset: String,
    },
}

/// Static description of a single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellDescriptor {
    kind: char,
    asset: String,
    spawnable: bool,
}

impl CellDescriptor {
    /// Creates a cell description.
    #[must_use]
    pub fn new(kind: char, asset: impl Into<String>, spawnable: bool) -> Self {
        Self {
            kind,
            asset: asset.into(),
            spawnable,
        }
    }

    /// Layout symbol identifying the tile type.
    #[must_use]
    pub const fn kind(&self) -> char {
        self.kind
    }

    /// Name of the visual asset drawn for the cell.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Whether entities may be placed on the cell when a game starts.
    #[must_use]
    pub const fn spawnable(&self) -> bool {
        self.spawnable
    }
}

/// Named image file referenced by a descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetSource {
    name: String,
    path: PathBuf,
}

impl AssetSource {
    /// Creates an asset entry.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name used by cells to reference the asset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the image file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read-only description of a field: its size, tile setup and assets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    width: u32,
    height: u32,
    tile_size: u32,
    cells: Vec<CellDescriptor>,
    assets: Vec<AssetSource>,
}

impl FieldDescriptor {
    /// Creates a descriptor from row-major cell entries.
    ///
    /// No validation happens here; the field performs it on construction.
    #[must_use]
    pub fn new(width: u32, height: u32, tile_size: u32, cells: Vec<CellDescriptor>) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells,
            assets: Vec::new(),
        }
    }

    /// Attaches the asset table used to load cell visuals.
    #[must_use]
    pub fn with_assets(mut self, assets: Vec<AssetSource>) -> Self {
        self.assets = assets;
        self
    }

    /// Reads a TOML descriptor from disk, resolving asset paths relative to
    /// the descriptor's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_toml_str(&contents, &base)
    }

    /// Parses a TOML descriptor, resolving asset paths against `base_path`.
    pub fn from_toml_str(contents: &str, base_path: &Path) -> Result<Self, DescriptorError> {
        let manifest: Manifest = toml::from_str(contents)?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            return Err(DescriptorError::UnsupportedVersion {
                found: manifest.version,
                expected: SUPPORTED_MANIFEST_VERSION,
            });
        }
        if !matches!(manifest.layout.first(), Some(row) if !row.is_empty()) {
            return Err(DescriptorError::EmptyLayout);
        }

        let mut tiles = BTreeMap::new();
        for (key, entry) in manifest.tiles {
            let mut chars = key.chars();
            let (Some(symbol), None) = (chars.next(), chars.next()) else {
                return Err(DescriptorError::InvalidSymbol { key });
            };
            if !manifest.assets.contains_key(&entry.asset) {
                return Err(DescriptorError::UnknownAsset {
                    symbol,
                    asset: entry.asset,
                });
            }
            let _ = tiles.insert(symbol, entry);
        }

        let expected = manifest.layout.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(expected * manifest.layout.len());
        for (row, line) in manifest.layout.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(DescriptorError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                let Some(entry) = tiles.get(&symbol) else {
                    return Err(DescriptorError::UnknownSymbol {
                        symbol,
                        position: Xy::new(saturating_i32(column), saturating_i32(row)),
                    });
                };
                cells.push(CellDescriptor::new(
                    symbol,
                    entry.asset.clone(),
                    entry.spawnable,
                ));
            }
        }

        let width = u32::try_from(expected).unwrap_or(u32::MAX);
        let height = u32::try_from(manifest.layout.len()).unwrap_or(u32::MAX);
        let assets = manifest
            .assets
            .into_iter()
            .map(|(name, relative)| AssetSource::new(name, base_path.join(relative)))
            .collect::<Vec<_>>();
        debug!(
            "parsed field descriptor: {width}x{height} cells, {} tile types, {} assets",
            tiles.len(),
            assets.len()
        );

        Ok(Self::new(width, height, manifest.tile_size, cells).with_assets(assets))
    }

    /// Checks the structural invariants a field relies on.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.width == 0 || self.height == 0 {
            return Err(DescriptorError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_size == 0 {
            return Err(DescriptorError::ZeroTileSize);
        }
        let overflow = DescriptorError::ExtentOverflow {
            width: self.width,
            height: self.height,
            tile_size: self.tile_size,
        };
        let pixel_width = u64::from(self.width) * u64::from(self.tile_size);
        let pixel_height = u64::from(self.height) * u64::from(self.tile_size);
        if i32::try_from(pixel_width).is_err() || i32::try_from(pixel_height).is_err() {
            return Err(overflow);
        }
        let composite_bytes = pixel_width
            .checked_mul(pixel_height)
            .and_then(|pixels| pixels.checked_mul(4));
        if !composite_bytes.is_some_and(|bytes| bytes <= MAX_COMPOSITE_BYTES) {
            return Err(overflow);
        }
        let expected = usize::try_from(u64::from(self.width) * u64::from(self.height))
            .map_err(|_| overflow)?;
        if self.cells.len() != expected {
            return Err(DescriptorError::CellCountMismatch {
                expected,
                found: self.cells.len(),
            });
        }
        Ok(())
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

    /// Edge length of a square tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Row-major cell entries.
    #[must_use]
    pub fn cells(&self) -> &[CellDescriptor] {
        &self.cells
    }

    /// Cell entry at `position`, if it lies inside the descriptor.
    #[must_use]
    pub fn cell(&self, position: Xy) -> Option<&CellDescriptor> {
        let index = position.row_major_index(self.width, self.height)?;
        self.cells.get(index)
    }

    /// Asset table in name order.
    #[must_use]
    pub fn assets(&self) -> &[AssetSource] {
        &self.assets
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    tile_size: u32,
    layout: Vec<String>,
    tiles: BTreeMap<String, TileEntry>,
    #[serde(default)]
    assets: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TileEntry {
    asset: String,
    #[serde(default)]
    spawnable: bool,
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: &str = r##"
        version = 1
        tile_size = 8
        layout = [
            "#S#",
            "#.S",
        ]

        [tiles."#"]
        asset = "wall"

        [tiles."."]
        asset = "floor"

        [tiles.S]
        asset = "floor"
        spawnable = true

        [assets]
        wall = "tiles/wall.png"
        floor = "tiles/floor.png"
    "##;

    #[test]
    fn parses_layout_in_row_major_order() {
        let descriptor =
            FieldDescriptor::from_toml_str(ARENA, Path::new("root")).expect("descriptor parses");

        assert_eq!(descriptor.width(), 3);
        assert_eq!(descriptor.height(), 2);
        assert_eq!(descriptor.tile_size(), 8);
        let kinds: String = descriptor.cells().iter().map(CellDescriptor::kind).collect();
        assert_eq!(kinds, "#S##.S");
        assert_eq!(
            descriptor.cell(Xy::new(1, 0)),
            Some(&CellDescriptor::new('S', "floor", true))
        );
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn resolves_asset_paths_relative_to_base_directory() {
        let descriptor =
            FieldDescriptor::from_toml_str(ARENA, Path::new("root")).expect("descriptor parses");
        let expected = vec![
            AssetSource::new("floor", "root/tiles/floor.png"),
            AssetSource::new("wall", "root/tiles/wall.png"),
        ];
        assert_eq!(descriptor.assets(), expected.as_slice());
    }

    #[test]
    fn rejects_unsupported_version() {
        let manifest = ARENA.replace("version = 1", "version = 2");
        let result = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
        assert!(matches!(
            result,
            Err(DescriptorError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn validate_rejects_cell_count_mismatch() {
        let descriptor =
            FieldDescriptor::new(2, 2, 4, vec![CellDescriptor::new('.', "floor", false)]);
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::CellCountMismatch {
                expected: 4,
                found: 1
            })
        ));
    }

    #[test]
    fn rejects_empty_layouts() {
        for layout in ["[]", "[\"\"]"] {
            let manifest = format!("version = 1\ntile_size = 4\nlayout = {layout}\n[tiles]\n");
            let result = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
            assert!(
                matches!(result, Err(DescriptorError::EmptyLayout)),
                "layout {layout}"
            );
        }
    }

    #[test]
    fn rejects_multi_character_tile_keys() {
        let manifest = ARENA.replace(r#"[tiles."."]"#, r#"[tiles."::"]"#);
        let result = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
        assert!(matches!(
            result,
            Err(DescriptorError::InvalidSymbol { key }) if key == "::"
        ));
    }

    #[test]
    fn rejects_tiles_referencing_unknown_assets() {
        let manifest = ARENA.replace(r#"asset = "wall""#, r#"asset = "lava""#);
        let result = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
        assert!(matches!(
            result,
            Err(DescriptorError::UnknownAsset { symbol: '#', asset }) if asset == "lava"
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let manifest = ARENA.replace(r##""#.S","##, r##""#.","##);
        let result = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
        assert!(matches!(
            result,
            Err(DescriptorError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn rejects_symbols_missing_from_the_tile_table() {
        let manifest = ARENA.replace(r##""#.S","##, r##""#?S","##);
        let result = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
        assert!(matches!(
            result,
            Err(DescriptorError::UnknownSymbol { symbol: '?', position }) if position == Xy::new(1, 1)
        ));
    }

    #[test]
    fn rejects_malformed_toml_and_unknown_keys() {
        let malformed = FieldDescriptor::from_toml_str("version = ", Path::new("."));
        assert!(matches!(malformed, Err(DescriptorError::Parse(_))));

        let manifest = ARENA.replace("tile_size = 8", "tile_size = 8\n        palette = \"warm\"");
        let unknown = FieldDescriptor::from_toml_str(&manifest, Path::new("."));
        assert!(matches!(unknown, Err(DescriptorError::Parse(_))));
    }

    #[test]
    fn reports_unreadable_descriptor_paths() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("missing.toml");
        let result = FieldDescriptor::from_path(&path);
        assert!(matches!(
            result,
            Err(DescriptorError::Read { path: reported, .. }) if reported == path
        ));
    }

    #[test]
    fn validate_caps_the_composite_allocation() {
        let floor = || vec![CellDescriptor::new('.', "floor", false)];

        // 16384 * 16384 * 4 bytes sits exactly on the cap.
        assert!(FieldDescriptor::new(1, 1, 16_384, floor())
            .validate()
            .is_ok());
        assert!(matches!(
            FieldDescriptor::new(1, 1, 16_385, floor()).validate(),
            Err(DescriptorError::ExtentOverflow {
                tile_size: 16_385,
                ..
            })
        ));
        assert!(matches!(
            FieldDescriptor::new(1, 1, 1 << 30, floor()).validate(),
            Err(DescriptorError::ExtentOverflow { .. })
        ));
    }

    #[test]
    fn validate_rejects_unaddressable_extent() {
        let descriptor = FieldDescriptor::new(1, 1, u32::MAX, Vec::new());
        assert!(matches!(
            descriptor.validate(),
            Err(DescriptorError::ExtentOverflow { .. })
        ));
    }
}
