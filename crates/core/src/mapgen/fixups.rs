//! Local corrections applied to resolved Catacombs tiles.
//!
//! Every pass skips protected cells.

use crate::types::{COARSE_SIZE, Direction, Pos, TileId};

use super::catacombs::tiles::{
    H_DOOR, H_DOOR_OPEN, H_WALL, H_WALL_DIRT, SOLID, V_DOOR, V_DOOR_OPEN, V_WALL, V_WALL_DIRT,
};
use super::grid::Grid;
use super::tileset::Tileset;

pub(super) struct FixupContext<'a> {
    pub(super) tiles: &'a mut Grid<TileId>,
    pub(super) protected: &'a Grid<bool>,
    pub(super) tileset: &'a Tileset,
}

impl FixupContext<'_> {
    pub(super) fn apply_all(&mut self) {
        self.remove_blind_doors();
        self.open_lockouts(Direction::Right);
        self.open_lockouts(Direction::Down);
        self.fix_door_frames();
        self.fix_dirt();
    }

    fn floor_at(&self, pos: Pos) -> bool {
        self.tiles.get(pos).is_some_and(|tile| self.tileset.is_floor(tile))
    }

    fn writable(&self, pos: Pos) -> bool {
        self.protected.get(pos) == Some(false)
    }

    /// Doors that do not lead from floor to floor become wall.
    fn remove_blind_doors(&mut self) {
        for pos in self.tiles.positions() {
            if !self.writable(pos) {
                continue;
            }
            let tile = self.tiles[pos];
            let west_east = self.floor_at(pos.offset(-1, 0)) && self.floor_at(pos.offset(1, 0));
            let north_south = self.floor_at(pos.offset(0, -1)) && self.floor_at(pos.offset(0, 1));
            if tile == V_DOOR && !west_east {
                self.tiles[pos] = V_WALL;
            } else if tile == H_DOOR && !north_south {
                self.tiles[pos] = H_WALL;
            }
        }
    }

    /// A wall run separating floor on both sides with no door anywhere along
    /// it gets a door at its far end, so neither side is sealed off.
    ///
    /// `along` is `Right` for horizontal walls and `Down` for vertical ones.
    fn open_lockouts(&mut self, along: Direction) {
        let (wall, door) =
            if along == Direction::Right { (H_WALL, H_DOOR) } else { (V_WALL, V_DOOR) };
        let (side_x, side_y) = if along == Direction::Right { (0, 1) } else { (1, 0) };
        let size = COARSE_SIZE as i32;
        for line in 0..size {
            let mut run_end: Option<Pos> = None;
            let mut run_has_door = false;
            for step in 0..=size {
                let pos = if along == Direction::Right {
                    Pos::new(step, line)
                } else {
                    Pos::new(line, step)
                };
                let tile = self.tiles.get(pos);
                let in_run = (tile == Some(wall) || tile == Some(door))
                    && self.floor_at(pos.offset(-side_x, -side_y))
                    && self.floor_at(pos.offset(side_x, side_y));
                if in_run {
                    run_has_door |= tile == Some(door);
                    run_end = Some(pos);
                    continue;
                }
                if let Some(end) = run_end.take()
                    && !run_has_door
                    && self.writable(end)
                {
                    self.tiles[end] = door;
                }
                run_has_door = false;
            }
        }
    }

    /// Doors with floor running along their frame lose the door leaf.
    fn fix_door_frames(&mut self) {
        for pos in self.tiles.positions() {
            if !self.writable(pos) {
                continue;
            }
            let opened = match self.tiles[pos] {
                V_DOOR if self.floor_at(pos.offset(0, -1)) => V_DOOR_OPEN,
                H_DOOR if self.floor_at(pos.offset(-1, 0)) => H_DOOR_OPEN,
                _ => continue,
            };
            self.tiles[pos] = opened;
        }
    }

    /// Walls backing onto solid rock get their dirt variant.
    fn fix_dirt(&mut self) {
        let solid = |tiles: &Grid<TileId>, pos: Pos| tiles.get(pos) == Some(SOLID);
        for pos in self.tiles.positions() {
            if !self.writable(pos) {
                continue;
            }
            let tiles = &*self.tiles;
            let dirt = match tiles[pos] {
                V_WALL if solid(tiles, pos.offset(-1, 0)) || solid(tiles, pos.offset(1, 0)) => {
                    V_WALL_DIRT
                }
                H_WALL if solid(tiles, pos.offset(0, -1)) || solid(tiles, pos.offset(0, 1)) => {
                    H_WALL_DIRT
                }
                _ => continue,
            };
            self.tiles[pos] = dirt;
        }
    }
}
