use pazzers_core::{AssetId, Xy};

/// Tile entity occupying one coordinate of a [`Field`](crate::Field).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Xy,
    kind: char,
    asset: AssetId,
    spawnable: bool,
}

impl Cell {
    pub(crate) const fn new(position: Xy, kind: char, asset: AssetId, spawnable: bool) -> Self {
        Self {
            position,
            kind,
            asset,
            spawnable,
        }
    }

    /// Grid coordinate of the cell.
    #[must_use]
    pub const fn position(&self) -> Xy {
        self.position
    }

    /// Layout symbol of the tile type.
    #[must_use]
    pub const fn kind(&self) -> char {
        self.kind
    }

    /// Handle of the visual asset drawn for the cell.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.asset
    }

    /// Whether entities may be placed on the cell when a game starts.
    #[must_use]
    pub const fn spawnable(&self) -> bool {
        self.spawnable
    }
}
