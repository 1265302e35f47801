//! Per-level-type tile tables consumed by the generic passes.

use serde::{Deserialize, Serialize};

use crate::types::{LevelType, TileId};

use super::catacombs;
use super::patterns::{AdjacencyFix, PatternRule};

/// Structural role of a tile id, shared by its variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileClass {
    /// Unused id.
    None,
    Floor,
    VerticalWall,
    HorizontalWall,
    Corner,
    Junction,
    Pillar,
    VerticalDoor,
    HorizontalDoor,
    Solid,
    UpStairs,
    DownStairs,
    WarpStairs,
}

impl TileClass {
    pub fn is_floor(self) -> bool {
        self == TileClass::Floor
    }
}

/// Search/replace template. Zero in `search` matches any tile; zero in
/// `replace` leaves the tile alone.
#[derive(Clone, Copy, Debug)]
pub(super) struct Miniset {
    pub(super) name: &'static str,
    pub(super) width: i32,
    pub(super) height: i32,
    pub(super) search: &'static [TileId],
    pub(super) replace: &'static [TileId],
}

impl Miniset {
    /// First non-zero replacement tile, used to keep copies apart.
    pub(super) fn signature(&self) -> Option<TileId> {
        self.replace.iter().copied().find(|&tile| tile != 0)
    }

    pub(super) fn search_at(&self, dx: i32, dy: i32) -> TileId {
        self.search[(dy * self.width + dx) as usize]
    }

    pub(super) fn replace_at(&self, dx: i32, dy: i32) -> TileId {
        self.replace[(dy * self.width + dx) as usize]
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Decoration {
    pub(super) miniset: Miniset,
    pub(super) percent: i32,
}

/// Stairs stamped on every level, with the fine-grid view offset used when
/// the player arrives on them.
#[derive(Clone, Copy, Debug)]
pub(super) struct Stairs {
    pub(super) miniset: Miniset,
    pub(super) view_offset: (i32, i32),
}

/// Shadow tiles written next to a trigger tile when the listed neighbours
/// are floor.
#[derive(Clone, Copy, Debug)]
pub(super) struct ShadowTrigger {
    pub(super) trigger: TileClass,
    pub(super) floor_at: &'static [(i32, i32)],
    pub(super) writes: &'static [(i32, i32, TileId)],
}

#[derive(Debug)]
pub(super) struct Tileset {
    pub(super) classes: &'static [TileClass],
    /// Substitution group per tile id; zero means the tile is never swapped.
    pub(super) substitution_groups: &'static [u8],
    pub(super) rules: &'static [PatternRule],
    pub(super) adjacency_fixes: &'static [AdjacencyFix],
    pub(super) fallback: TileId,
    pub(super) up_stairs: Stairs,
    pub(super) down_stairs: Stairs,
    pub(super) warp_stairs: Stairs,
    pub(super) decorations: &'static [Decoration],
    pub(super) shadows: &'static [ShadowTrigger],
}

impl Tileset {
    pub(super) fn class_of(&self, tile: TileId) -> TileClass {
        self.classes.get(usize::from(tile)).copied().unwrap_or(TileClass::None)
    }

    pub(super) fn is_floor(&self, tile: TileId) -> bool {
        self.class_of(tile).is_floor()
    }

    pub(super) fn substitution_group(&self, tile: TileId) -> u8 {
        self.substitution_groups.get(usize::from(tile)).copied().unwrap_or(0)
    }
}

pub(super) fn tileset(level_type: LevelType) -> &'static Tileset {
    match level_type {
        LevelType::Catacombs => &catacombs::TILESET,
    }
}
