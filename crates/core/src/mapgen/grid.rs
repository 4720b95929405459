//! Flat row-major tile buffer and neighbourhood helpers shared by every pass.

use serde::Serialize;

use crate::types::{TerrainCategory, TileId};

pub(super) const CARDINAL_OFFSETS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub(super) const NEIGHBOR_OFFSETS: [(i64, i64); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
}

impl TileGrid {
    pub(crate) fn filled(width: usize, height: usize, tile: TileId) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn get(&self, x: usize, y: usize) -> TileId {
        self.tiles[y * self.width + x]
    }

    pub fn category_at(&self, x: usize, y: usize) -> TerrainCategory {
        self.get(x, y).category()
    }

    pub fn count_category(&self, category: TerrainCategory) -> usize {
        self.tiles.iter().filter(|tile| tile.category() == category).count()
    }

    pub fn buildable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_buildable()).count()
    }

    pub fn buildable_ratio(&self) -> f64 {
        if self.tiles.is_empty() {
            return 0.0;
        }
        self.buildable_count() as f64 / self.tiles.len() as f64
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, tile: TileId) {
        self.tiles[y * self.width + x] = tile;
    }

    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub(crate) fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Resolves `(x + dx, y + dy)` when it lies inside the grid.
    pub(crate) fn offset(&self, x: usize, y: usize, dx: i64, dy: i64) -> Option<(usize, usize)> {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        self.contains(nx, ny).then_some((nx as usize, ny as usize))
    }

    pub(crate) fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub(crate) fn cardinal_neighbors(
        &self,
        x: usize,
        y: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        CARDINAL_OFFSETS.iter().filter_map(move |&(dx, dy)| self.offset(x, y, dx, dy))
    }

    pub(crate) fn count_neighbors_in(&self, x: usize, y: usize, category: TerrainCategory) -> usize {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.offset(x, y, dx, dy))
            .filter(|&(nx, ny)| self.category_at(nx, ny) == category)
            .count()
    }
}

/// Euclidean distance between a cell and a fractional centre.
pub(super) fn distance(x: usize, y: usize, cx: f64, cy: f64) -> f64 {
    let dx = x as f64 - cx;
    let dy = y as f64 - cy;
    (dx * dx + dy * dy).sqrt()
}

/// Cells whose distance to `(cx, cy)` may fall under `reach`, clipped to the grid.
pub(super) fn disc_bounds(
    width: usize,
    height: usize,
    cx: f64,
    cy: f64,
    reach: f64,
) -> impl Iterator<Item = (usize, usize)> {
    let clip = |value: f64, limit: usize| -> usize { value.floor().clamp(0.0, limit as f64) as usize };
    let min_x = clip(cx - reach, width);
    let max_x = clip(cx + reach + 1.0, width);
    let min_y = clip(cy - reach, height);
    let max_y = clip(cy + reach + 1.0, height);
    (min_y..max_y).flat_map(move |y| (min_x..max_x).map(move |x| (x, y)))
}
