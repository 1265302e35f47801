//! Ordered 3×3 rule matching that turns carve markup into tile ids.

use crate::types::{COARSE_SIZE, Direction, Pos, TileId};

use super::grid::Grid;
use super::layout::Marker;

/// Predicate over one cell of a rule window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Cell {
    Any,
    Wall,
    Floor,
    Void,
    Door,
    DoorOrWall,
    VoidOrFloor,
    WallOrVoid,
}

impl Cell {
    /// Cells outside the grid satisfy every predicate.
    fn matches(self, marker: Option<Marker>) -> bool {
        let Some(marker) = marker else {
            return true;
        };
        match self {
            Cell::Any => true,
            Cell::Wall => marker == Marker::Wall,
            Cell::Floor => marker == Marker::Floor,
            Cell::Void => marker == Marker::Void,
            Cell::Door => marker == Marker::Door,
            Cell::DoorOrWall => matches!(marker, Marker::Door | Marker::Wall),
            Cell::VoidOrFloor => matches!(marker, Marker::Void | Marker::Floor),
            Cell::WallOrVoid => matches!(marker, Marker::Wall | Marker::Void),
        }
    }
}

/// Window predicates in row-major order, north-west first.
#[derive(Clone, Copy, Debug)]
pub(super) struct PatternRule {
    pub(super) window: [Cell; 9],
    pub(super) tile: TileId,
}

/// Rewrites a pair of neighbouring tiles that read wrong side by side.
#[derive(Clone, Copy, Debug)]
pub(super) struct AdjacencyFix {
    pub(super) first: TileId,
    /// Neighbour of `first` toward `toward`; only `Right` and `Down` are used.
    pub(super) second: TileId,
    pub(super) toward: Direction,
    pub(super) replacement: (TileId, TileId),
}

/// Tile for one cell: the first rule whose window matches.
pub(super) fn resolve_tile(
    markers: &Grid<Marker>,
    rules: &[PatternRule],
    fallback: TileId,
    pos: Pos,
) -> TileId {
    rules
        .iter()
        .find(|rule| {
            rule.window.iter().enumerate().all(|(index, cell)| {
                let dx = (index % 3) as i32 - 1;
                let dy = (index / 3) as i32 - 1;
                cell.matches(markers.get(pos.offset(dx, dy)))
            })
        })
        .map_or(fallback, |rule| rule.tile)
}

pub(super) fn resolve_tiles(
    markers: &Grid<Marker>,
    rules: &[PatternRule],
    fallback: TileId,
) -> Grid<TileId> {
    let mut tiles = Grid::new(COARSE_SIZE, COARSE_SIZE, fallback);
    for pos in markers.positions() {
        tiles[pos] = resolve_tile(markers, rules, fallback, pos);
    }
    tiles
}

/// Applies each fix over the whole grid in row-major order, fix by fix.
pub(super) fn apply_adjacency_fixes(tiles: &mut Grid<TileId>, fixes: &[AdjacencyFix]) {
    for fix in fixes {
        for pos in tiles.positions() {
            let next = pos.step(fix.toward);
            if tiles.get(pos) == Some(fix.first) && tiles.get(next) == Some(fix.second) {
                tiles.set(pos, fix.replacement.0);
                tiles.set(next, fix.replacement.1);
            }
        }
    }
}
