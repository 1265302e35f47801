//! Cosmetic passes run last: random tile variants and door/pillar shadows.

use crate::rng::RandomSource;
use crate::types::{Pos, Rect, TileId};

use super::grid::Grid;
use super::tileset::Tileset;

pub(super) struct TextureContext<'a, R> {
    pub(super) rng: &'a mut R,
    pub(super) tiles: &'a mut Grid<TileId>,
    pub(super) protected: &'a Grid<bool>,
    pub(super) tileset: &'a Tileset,
    pub(super) set_piece_area: Option<Rect>,
}

impl<R: RandomSource> TextureContext<'_, R> {
    /// Swaps roughly one tile in four for another member of its substitution
    /// group, avoiding repeats of the same variant close together.
    pub(super) fn substitute(&mut self) -> usize {
        let groups = self.tileset.substitution_groups;
        let mut swapped = 0;
        for pos in self.tiles.positions() {
            if self.set_piece_area.is_some_and(|area| area.contains(pos)) || self.protected[pos] {
                continue;
            }
            if self.rng.next(4) != 0 {
                continue;
            }
            let group = self.tileset.substitution_group(self.tiles[pos]);
            if group == 0 {
                continue;
            }
            let mut remaining = self.rng.next(16);
            let mut index = groups.len() - 1;
            loop {
                index = (index + 1) % groups.len();
                if groups[index] == group {
                    if remaining == 0 {
                        break;
                    }
                    remaining -= 1;
                }
            }
            let variant = index as TileId;
            let window = Rect::new(pos.x - 2, pos.y - 2, pos.x + 1, pos.y + 1);
            if !window.cells().any(|cell| self.tiles.get(cell) == Some(variant)) {
                self.tiles[pos] = variant;
                swapped += 1;
            }
        }
        swapped
    }

    pub(super) fn apply_shadows(&mut self) {
        let tileset = self.tileset;
        for pos in self.tiles.positions() {
            let class = tileset.class_of(self.tiles[pos]);
            for trigger in tileset.shadows.iter().filter(|trigger| trigger.trigger == class) {
                let lit =
                    trigger.floor_at.iter().all(|&(dx, dy)| self.floor_at(pos.offset(dx, dy)));
                if !lit {
                    continue;
                }
                for &(dx, dy, shadow) in trigger.writes {
                    let target = pos.offset(dx, dy);
                    if self.protected.get(target) == Some(false) && self.floor_at(target) {
                        self.tiles[target] = shadow;
                    }
                }
            }
        }
    }

    fn floor_at(&self, pos: Pos) -> bool {
        self.tiles.get(pos).is_some_and(|tile| self.tileset.is_floor(tile))
    }
}
