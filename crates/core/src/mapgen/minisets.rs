//! Stamping search/replace templates onto the tile grid.

use crate::error::AttemptFailure;
use crate::rng::RandomSource;
use crate::types::{COARSE_SIZE, Pos, Rect, TileId};

use super::grid::Grid;
use super::tileset::{Decoration, Miniset};

pub(super) struct MinisetContext<'a, R> {
    pub(super) rng: &'a mut R,
    pub(super) tiles: &'a mut Grid<TileId>,
    pub(super) protected: &'a Grid<bool>,
    pub(super) set_piece_area: Option<Rect>,
}

impl<R: RandomSource> MinisetContext<'_, R> {
    /// Places a template that the level cannot do without.
    ///
    /// Starts from a random origin and scans forward row by row, wrapping
    /// at the grid end. Returns the top-left corner of the stamp.
    pub(super) fn place_mandatory(
        &mut self,
        miniset: &Miniset,
        max_tries: u32,
    ) -> Result<Pos, AttemptFailure> {
        let span_x = COARSE_SIZE as i32 - miniset.width;
        let span_y = COARSE_SIZE as i32 - miniset.height;
        let mut origin = Pos::new(self.rng.next(span_x), self.rng.next(span_y));
        let mut rejected = 0_u32;
        while !self.fits_mandatory(miniset, origin) {
            rejected += 1;
            if rejected > max_tries {
                return Err(AttemptFailure::MinisetPlacement {
                    miniset: miniset.name,
                    tries: max_tries,
                });
            }
            origin.x += 1;
            if origin.x >= span_x {
                origin.x = 0;
                origin.y += 1;
                if origin.y >= span_y {
                    origin.y = 0;
                }
            }
        }
        self.stamp(miniset, origin);
        Ok(origin)
    }

    /// Offers every origin to a decoration once, in row-major order; only
    /// candidates that pass every check consume a roll.
    pub(super) fn place_decoration(&mut self, decoration: &Decoration) -> usize {
        let miniset = &decoration.miniset;
        let signature = miniset.signature();
        let mut placed = 0;
        for y in 0..COARSE_SIZE as i32 - miniset.height {
            for x in 0..COARSE_SIZE as i32 - miniset.width {
                let origin = Pos::new(x, y);
                if !self.matches(miniset, origin) || self.touches_protected(miniset, origin) {
                    continue;
                }
                if signature.is_some_and(|tile| self.signature_nearby(miniset, origin, tile)) {
                    continue;
                }
                if self.rng.next(100) < decoration.percent {
                    self.stamp(miniset, origin);
                    placed += 1;
                }
            }
        }
        placed
    }

    fn fits_mandatory(&self, miniset: &Miniset, origin: Pos) -> bool {
        let footprint = Rect::from_size(origin, miniset.width, miniset.height);
        self.matches(miniset, origin)
            && !self.touches_protected(miniset, origin)
            && !self.set_piece_area.is_some_and(|area| area.intersects(&footprint))
    }

    fn matches(&self, miniset: &Miniset, origin: Pos) -> bool {
        footprint(miniset).all(|(dx, dy)| {
            let wanted = miniset.search_at(dx, dy);
            wanted == 0 || self.tiles.get(origin.offset(dx, dy)) == Some(wanted)
        })
    }

    fn touches_protected(&self, miniset: &Miniset, origin: Pos) -> bool {
        footprint(miniset).any(|(dx, dy)| self.protected.get(origin.offset(dx, dy)) == Some(true))
    }

    /// Whether `tile` already appears within one template size around `origin`.
    fn signature_nearby(&self, miniset: &Miniset, origin: Pos, tile: TileId) -> bool {
        let window = Rect::new(
            origin.x - miniset.width,
            origin.y - miniset.height,
            origin.x + 2 * miniset.width - 1,
            origin.y + 2 * miniset.height - 1,
        );
        window.cells().any(|pos| self.tiles.get(pos) == Some(tile))
    }

    fn stamp(&mut self, miniset: &Miniset, origin: Pos) {
        for (dx, dy) in footprint(miniset) {
            let tile = miniset.replace_at(dx, dy);
            if tile != 0 {
                self.tiles.set(origin.offset(dx, dy), tile);
            }
        }
    }
}

fn footprint(miniset: &Miniset) -> impl Iterator<Item = (i32, i32)> + use<> {
    let (width, height) = (miniset.width, miniset.height);
    (0..height).flat_map(move |dy| (0..width).map(move |dx| (dx, dy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{LevelRng, RecordingRng};

    const FLOOR: TileId = 3;
    const WALL: TileId = 1;

    static SEARCH: [TileId; 4] = [FLOOR; 4];
    static REPLACE: [TileId; 4] = [0, 40, 41, 0];
    const BLOCK: Miniset =
        Miniset { name: "block", width: 2, height: 2, search: &SEARCH, replace: &REPLACE };

    fn walls_with_floor(area: Rect) -> Grid<TileId> {
        let mut tiles = Grid::new(COARSE_SIZE, COARSE_SIZE, WALL);
        for pos in area.cells() {
            tiles[pos] = FLOOR;
        }
        tiles
    }

    #[test]
    fn mandatory_placement_scans_to_the_only_fit() {
        let mut tiles = walls_with_floor(Rect::new(30, 30, 31, 31));
        let protected = Grid::new(COARSE_SIZE, COARSE_SIZE, false);
        let mut rng = LevelRng::new(8);
        let origin = MinisetContext {
            rng: &mut rng,
            tiles: &mut tiles,
            protected: &protected,
            set_piece_area: None,
        }
        .place_mandatory(&BLOCK, 4000)
        .expect("one fit exists");

        assert_eq!(origin, Pos::new(30, 30));
        assert_eq!(tiles[Pos::new(30, 30)], FLOOR);
        assert_eq!(tiles[Pos::new(31, 30)], 40);
        assert_eq!(tiles[Pos::new(30, 31)], 41);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn mandatory_placement_respects_protection_and_the_set_piece() {
        let protected_fit = Rect::new(4, 4, 5, 5);
        let mut tiles = walls_with_floor(protected_fit);
        for pos in Rect::new(20, 4, 21, 5).cells() {
            tiles[pos] = FLOOR;
        }
        let mut protected = Grid::new(COARSE_SIZE, COARSE_SIZE, false);
        protected[Pos::new(5, 5)] = true;
        let mut rng = LevelRng::new(2);
        let mut context = MinisetContext {
            rng: &mut rng,
            tiles: &mut tiles,
            protected: &protected,
            set_piece_area: Some(Rect::new(18, 2, 20, 8)),
        };

        let failure = context.place_mandatory(&BLOCK, 4000);
        assert_eq!(
            failure,
            Err(AttemptFailure::MinisetPlacement { miniset: "block", tries: 4000 })
        );
    }

    #[test]
    fn decorations_roll_only_for_valid_candidates_and_keep_their_distance() {
        let mut tiles = walls_with_floor(Rect::new(2, 2, 9, 3));
        let protected = Grid::new(COARSE_SIZE, COARSE_SIZE, false);
        let mut rng = RecordingRng::new(LevelRng::new(4));
        let decoration = Decoration { miniset: BLOCK, percent: 100 };
        let placed = MinisetContext {
            rng: &mut rng,
            tiles: &mut tiles,
            protected: &protected,
            set_piece_area: None,
        }
        .place_decoration(&decoration);

        // Origins x = 2 and x = 6 are stamped; every other origin either
        // overlaps a stamp or sees its signature nearby.
        assert_eq!(placed, 2);
        assert_eq!(rng.trace().len(), 2);
        assert!(rng.trace().iter().all(|draw| draw.bound == 100));
        assert_eq!(tiles[Pos::new(3, 2)], 40);
        assert_eq!(tiles[Pos::new(7, 2)], 40);
    }
}
