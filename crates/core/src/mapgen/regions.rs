//! Visibility regions: connected floor components tagged on the fine grid.

use crate::types::{FINE_SIZE, Pos, RegionId, TileId};

use super::grid::Grid;
use super::tileset::{TileClass, Tileset};

pub(super) fn build_regions(tiles: &Grid<TileId>, tileset: &Tileset) -> Grid<RegionId> {
    let mut builder = RegionBuilder {
        tiles,
        tileset,
        filled: Grid::new(tiles.width(), tiles.height(), false),
        regions: Grid::new(FINE_SIZE, FINE_SIZE, 0),
    };
    let mut next_id: RegionId = 1;
    for pos in tiles.positions() {
        if builder.filled[pos] || !tileset.is_floor(tiles[pos]) {
            continue;
        }
        builder.fill(pos, next_id);
        next_id += 1;
    }
    builder.copy_across_walls();
    builder.regions
}

struct RegionBuilder<'a> {
    tiles: &'a Grid<TileId>,
    tileset: &'a Tileset,
    filled: Grid<bool>,
    regions: Grid<RegionId>,
}

impl RegionBuilder<'_> {
    fn is_open_floor(&self, pos: Pos) -> bool {
        self.filled.get(pos) == Some(false)
            && self.tiles.get(pos).is_some_and(|tile| self.tileset.is_floor(tile))
    }

    /// Scanline fill with diagonal connectivity.
    fn fill(&mut self, seed: Pos, id: RegionId) {
        let mut pending = vec![seed];
        while let Some(pos) = pending.pop() {
            if !self.is_open_floor(pos) {
                continue;
            }
            let mut left = pos.x;
            while self.is_open_floor(Pos::new(left - 1, pos.y)) {
                left -= 1;
            }
            let mut right = pos.x;
            while self.is_open_floor(Pos::new(right + 1, pos.y)) {
                right += 1;
            }
            for x in left..=right {
                self.tag(Pos::new(x, pos.y), id);
            }
            for row in [pos.y - 1, pos.y + 1] {
                for x in (left - 1)..=(right + 1) {
                    let candidate = Pos::new(x, row);
                    if self.is_open_floor(candidate) {
                        pending.push(candidate);
                    }
                }
            }
        }
    }

    /// Tags a floor cell's whole fine block and the facing parts of its
    /// non-floor neighbours.
    fn tag(&mut self, pos: Pos, id: RegionId) {
        self.filled[pos] = true;
        let fine = pos.to_fine();
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            self.regions.set(fine.offset(dx, dy), id);
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                let neighbour = pos.offset(dx, dy);
                let Some(tile) = self.tiles.get(neighbour) else {
                    continue;
                };
                if (dx, dy) == (0, 0) || self.tileset.is_floor(tile) {
                    continue;
                }
                let block = neighbour.to_fine();
                // Fine columns (rows) of the neighbour that face back toward `pos`.
                let columns = match dx {
                    1 => 0..=0,
                    -1 => 1..=1,
                    _ => 0..=1,
                };
                let rows = match dy {
                    1 => 0..=0,
                    -1 => 1..=1,
                    _ => 0..=1,
                };
                for fy in rows {
                    for fx in columns.clone() {
                        let cell = block.offset(fx, fy);
                        if self.regions.get(cell) == Some(0) {
                            self.regions.set(cell, id);
                        }
                    }
                }
            }
        }
    }

    /// Wall blocks take one region across the whole wall face.
    fn copy_across_walls(&mut self) {
        for pos in self.tiles.positions() {
            let fine = pos.to_fine();
            let pairs = match self.tileset.class_of(self.tiles[pos]) {
                TileClass::VerticalWall | TileClass::VerticalDoor => {
                    [((0, 0), (1, 0)), ((0, 1), (1, 1))]
                }
                TileClass::HorizontalWall | TileClass::HorizontalDoor => {
                    [((0, 0), (0, 1)), ((1, 0), (1, 1))]
                }
                _ => continue,
            };
            for ((fx, fy), (tx, ty)) in pairs {
                let source = self.regions[fine.offset(fx, fy)];
                let target = fine.offset(tx, ty);
                if source != 0 && self.regions[target] == 0 {
                    self.regions[target] = source;
                }
            }
        }
    }
}
