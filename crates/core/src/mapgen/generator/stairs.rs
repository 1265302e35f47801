//! Mandatory stairs and the arrival view they decide.

use crate::error::AttemptFailure;
use crate::rng::RandomSource;
use crate::types::{EntryKind, Pos, Rect, TileId};

use super::super::grid::Grid;
use super::super::minisets::MinisetContext;
use super::super::model::{MinisetKind, MinisetPlacement};
use super::super::tileset::{Stairs, Tileset};

pub(super) struct StairsContext<'a, R> {
    pub(super) rng: &'a mut R,
    pub(super) tiles: &'a mut Grid<TileId>,
    pub(super) protected: &'a Grid<bool>,
    pub(super) set_piece_area: Option<Rect>,
    pub(super) tileset: &'a Tileset,
    pub(super) entry: EntryKind,
    pub(super) town_warp: bool,
    pub(super) max_tries: u32,
}

/// Stamps up, down, and (when wanted) warp stairs in that order. Returns the
/// placements and the fine-grid view from the stairs matching the entry.
pub(super) fn place_stairs<R: RandomSource>(
    context: &mut StairsContext<'_, R>,
) -> Result<(Vec<MinisetPlacement>, Pos), AttemptFailure> {
    let view_kind = match context.entry {
        EntryKind::Main => MinisetKind::UpStairs,
        EntryKind::Prev => MinisetKind::DownStairs,
        EntryKind::TownWarp => MinisetKind::WarpStairs,
    };
    let mut kinds = vec![MinisetKind::UpStairs, MinisetKind::DownStairs];
    if context.town_warp || context.entry == EntryKind::TownWarp {
        kinds.push(MinisetKind::WarpStairs);
    }

    let mut placer = MinisetContext {
        rng: &mut *context.rng,
        tiles: &mut *context.tiles,
        protected: context.protected,
        set_piece_area: context.set_piece_area,
    };
    let mut placements = Vec::with_capacity(kinds.len());
    let mut view = Pos::default();
    for kind in kinds {
        let stairs = stairs_for(context.tileset, kind);
        let anchor = placer.place_mandatory(&stairs.miniset, context.max_tries)?;
        let sets_view = kind == view_kind;
        if sets_view {
            let (dx, dy) = stairs.view_offset;
            view = anchor.to_fine().offset(dx, dy);
        }
        placements.push(MinisetPlacement { kind, anchor, sets_view });
    }
    Ok((placements, view))
}

fn stairs_for(tileset: &Tileset, kind: MinisetKind) -> &Stairs {
    match kind {
        MinisetKind::UpStairs => &tileset.up_stairs,
        MinisetKind::DownStairs => &tileset.down_stairs,
        MinisetKind::WarpStairs => &tileset.warp_stairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::catacombs::tiles::{FLOOR, SOLID, UP_STAIRS, WARP_STAIRS};
    use crate::mapgen::tileset::tileset;
    use crate::rng::LevelRng;
    use crate::types::{COARSE_SIZE, LevelType};

    fn open_level() -> Grid<TileId> {
        let mut tiles = Grid::new(COARSE_SIZE, COARSE_SIZE, SOLID);
        for pos in Rect::new(2, 2, 37, 37).cells() {
            tiles[pos] = FLOOR;
        }
        tiles
    }

    fn place(entry: EntryKind, town_warp: bool) -> (Grid<TileId>, Vec<MinisetPlacement>, Pos) {
        let mut tiles = open_level();
        let protected = Grid::new(COARSE_SIZE, COARSE_SIZE, false);
        let mut rng = LevelRng::new(3);
        let (placements, view) = place_stairs(&mut StairsContext {
            rng: &mut rng,
            tiles: &mut tiles,
            protected: &protected,
            set_piece_area: None,
            tileset: tileset(LevelType::Catacombs),
            entry,
            town_warp,
            max_tries: 4000,
        })
        .expect("open floor fits every stairs template");
        (tiles, placements, view)
    }

    #[test]
    fn main_entry_views_from_the_up_stairs() {
        let (tiles, placements, view) = place(EntryKind::Main, false);
        let kinds: Vec<_> = placements.iter().map(|placement| placement.kind).collect();
        assert_eq!(kinds, [MinisetKind::UpStairs, MinisetKind::DownStairs]);
        let up = placements[0];
        assert!(up.sets_view && !placements[1].sets_view);
        assert_eq!(view, up.anchor.to_fine().offset(5, 4));
        assert_eq!(tiles[up.anchor.offset(1, 1)], UP_STAIRS[0]);
    }

    #[test]
    fn prev_entry_views_from_the_down_stairs() {
        let (_, placements, view) = place(EntryKind::Prev, false);
        let down = placements[1];
        assert!(down.sets_view);
        assert_eq!(view, down.anchor.to_fine().offset(4, 6));
    }

    #[test]
    fn town_warp_adds_warp_stairs_last() {
        let (tiles, placements, _) = place(EntryKind::Main, true);
        assert_eq!(placements.len(), 3);
        let warp = placements[2];
        assert_eq!(warp.kind, MinisetKind::WarpStairs);
        assert!(!warp.sets_view);
        assert_eq!(tiles[warp.anchor.offset(1, 1)], WARP_STAIRS[0]);

        let (_, placements, view) = place(EntryKind::TownWarp, false);
        assert_eq!(placements.len(), 3);
        assert!(placements[2].sets_view);
        assert_eq!(view, placements[2].anchor.to_fine().offset(5, 4));
    }
}
