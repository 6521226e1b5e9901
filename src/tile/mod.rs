//! Tile layouts and tile-membership resolution.
//!
//! A [`TileLayout`] is the validated, ordered set of capture regions of one
//! camera rig. Tile indices are positions in the caller-supplied order.

use crate::geometry::{BBox, Tile};
use crate::util::{RoiNmsError, RoiNmsResult};
use std::collections::BTreeSet;

/// Set of tile indices a box overlaps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileIds(BTreeSet<usize>);

impl TileIds {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when both sets contain at least one common index.
    pub fn shares_tile(&self, other: &TileIds) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Returns true when tile `idx` is in the set.
    pub fn contains(&self, idx: usize) -> bool {
        self.0.contains(&idx)
    }

    /// Number of overlapped tiles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the box lies outside every tile.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Returns the indices in ascending order.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl FromIterator<usize> for TileIds {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Returns the indices of `tiles` whose interior intersects the interior of
/// `bbox`.
///
/// Edge or corner contact does not count as overlap.
pub fn tiles_overlapping(bbox: &BBox, tiles: &[Tile]) -> TileIds {
    tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| bbox.overlaps_strictly(&tile.to_bbox()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Validated, non-empty tile configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayout {
    tiles: Vec<Tile>,
}

impl TileLayout {
    /// Creates a layout, rejecting an empty list, non-finite values and
    /// negative sizes.
    pub fn new(tiles: Vec<Tile>) -> RoiNmsResult<Self> {
        if tiles.is_empty() {
            return Err(RoiNmsError::config("tile layout is empty"));
        }
        for (idx, tile) in tiles.iter().enumerate() {
            if !tile.to_array().iter().all(|v| v.is_finite()) {
                return Err(RoiNmsError::config(format!(
                    "tile {idx} has non-finite values {:?}",
                    tile.to_array()
                )));
            }
            if tile.width < 0.0 || tile.height < 0.0 {
                return Err(RoiNmsError::config(format!(
                    "tile {idx} has negative size {}x{}",
                    tile.width, tile.height
                )));
            }
        }
        Ok(Self { tiles })
    }

    /// Creates a layout from `[left, top, width, height]` rows.
    pub fn from_tlwh(rows: &[[f64; 4]]) -> RoiNmsResult<Self> {
        Self::new(rows.iter().copied().map(Tile::from_array).collect())
    }

    /// Tiles in index order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles; at least one.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false for a constructed layout; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile indices overlapped by `bbox`.
    pub fn overlapping(&self, bbox: &BBox) -> TileIds {
        tiles_overlapping(bbox, &self.tiles)
    }
}
