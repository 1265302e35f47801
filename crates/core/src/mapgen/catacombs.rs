//! Catacombs tile set: ids, classes, resolution rules, and templates.

use crate::types::{Direction, TileId};

use super::patterns::{AdjacencyFix, Cell, PatternRule};
use super::tileset::{Decoration, Miniset, ShadowTrigger, Stairs, TileClass, Tileset};

/// Catacombs tile ids.
pub mod tiles {
    use crate::types::TileId;

    pub const V_WALL: TileId = 1;
    pub const H_WALL: TileId = 2;
    pub const FLOOR: TileId = 3;
    pub const V_DOOR: TileId = 4;
    pub const H_DOOR: TileId = 5;
    pub const CORNER_TOP_LEFT: TileId = 6;
    pub const V_DOOR_OPEN: TileId = 7;
    pub const CORNER_TOP_RIGHT: TileId = 8;
    pub const H_DOOR_OPEN: TileId = 9;
    pub const CORNER_BOTTOM_LEFT: TileId = 10;
    pub const CORNER_BOTTOM_RIGHT: TileId = 11;
    pub const V_WALL_END: TileId = 12;
    pub const H_WALL_END: TileId = 13;
    pub const PILLAR: TileId = 14;
    pub const T_SOUTH: TileId = 15;
    pub const T_NORTH: TileId = 16;
    pub const T_EAST: TileId = 17;
    pub const T_WEST: TileId = 18;
    pub const JUNCTION: TileId = 19;
    pub const SOLID: TileId = 20;
    pub const V_WALL_DIRT: TileId = 21;
    pub const H_WALL_DIRT: TileId = 22;
    pub const UP_STAIRS: [TileId; 4] = [33, 34, 35, 36];
    pub const DOWN_STAIRS: [TileId; 4] = [37, 38, 39, 40];
    pub const WARP_STAIRS: [TileId; 4] = [41, 42, 43, 44];
    pub const SHADOW_CORNER: TileId = 65;
    pub const SHADOW_V: TileId = 66;
    pub const SHADOW_H: TileId = 67;
}

use tiles::*;

const TILE_COUNT: usize = 68;

const fn build_classes() -> [TileClass; TILE_COUNT] {
    use TileClass as C;
    let mut classes = [C::None; TILE_COUNT];
    classes[V_WALL as usize] = C::VerticalWall;
    classes[H_WALL as usize] = C::HorizontalWall;
    classes[FLOOR as usize] = C::Floor;
    classes[V_DOOR as usize] = C::VerticalDoor;
    classes[H_DOOR as usize] = C::HorizontalDoor;
    classes[CORNER_TOP_LEFT as usize] = C::Corner;
    classes[V_DOOR_OPEN as usize] = C::VerticalDoor;
    classes[CORNER_TOP_RIGHT as usize] = C::Corner;
    classes[H_DOOR_OPEN as usize] = C::HorizontalDoor;
    classes[CORNER_BOTTOM_LEFT as usize] = C::Corner;
    classes[CORNER_BOTTOM_RIGHT as usize] = C::Corner;
    classes[V_WALL_END as usize] = C::VerticalWall;
    classes[H_WALL_END as usize] = C::HorizontalWall;
    classes[PILLAR as usize] = C::Pillar;
    let mut id = T_SOUTH as usize;
    while id <= JUNCTION as usize {
        classes[id] = C::Junction;
        id += 1;
    }
    classes[SOLID as usize] = C::Solid;
    classes[V_WALL_DIRT as usize] = C::VerticalWall;
    classes[H_WALL_DIRT as usize] = C::HorizontalWall;
    let mut variant = 0;
    while variant < 3 {
        classes[23 + variant] = C::VerticalWall;
        classes[26 + variant] = C::HorizontalWall;
        variant += 1;
    }
    let mut variant = 0;
    while variant < 4 {
        classes[29 + variant] = C::Floor;
        classes[UP_STAIRS[variant] as usize] = C::UpStairs;
        classes[DOWN_STAIRS[variant] as usize] = C::DownStairs;
        classes[WARP_STAIRS[variant] as usize] = C::WarpStairs;
        classes[61 + variant] = C::Floor;
        variant += 1;
    }
    classes[45] = C::VerticalDoor;
    classes[46] = C::HorizontalDoor;
    classes[47] = C::VerticalDoor;
    classes[48] = C::HorizontalDoor;
    classes[49] = C::Pillar;
    classes[50] = C::Floor;
    classes[51] = C::Floor;
    classes[52] = C::Floor;
    classes[54] = C::VerticalWall;
    classes[55] = C::HorizontalWall;
    classes[56] = C::Floor;
    classes[57] = C::Floor;
    classes[58] = C::Floor;
    classes[59] = C::VerticalWall;
    classes[60] = C::HorizontalWall;
    classes[SHADOW_CORNER as usize] = C::Floor;
    classes[SHADOW_V as usize] = C::Floor;
    classes[SHADOW_H as usize] = C::Floor;
    classes
}

const fn build_substitution_groups() -> [u8; TILE_COUNT] {
    let mut groups = [0; TILE_COUNT];
    groups[V_WALL as usize] = 1;
    groups[H_WALL as usize] = 2;
    groups[FLOOR as usize] = 3;
    let mut variant = 0;
    while variant < 3 {
        groups[23 + variant] = 1;
        groups[26 + variant] = 2;
        variant += 1;
    }
    let mut variant = 0;
    while variant < 4 {
        groups[29 + variant] = 3;
        variant += 1;
    }
    groups
}

static CLASSES: [TileClass; TILE_COUNT] = build_classes();
static SUBSTITUTION_GROUPS: [u8; TILE_COUNT] = build_substitution_groups();

const __: Cell = Cell::Any;
const WA: Cell = Cell::Wall;
const FL: Cell = Cell::Floor;
const VO: Cell = Cell::Void;
const DO: Cell = Cell::Door;
const DW: Cell = Cell::DoorOrWall;
const VF: Cell = Cell::VoidOrFloor;
const WV: Cell = Cell::WallOrVoid;

const fn rule(window: [Cell; 9], tile: TileId) -> PatternRule {
    PatternRule { window, tile }
}

// Wall rules read the four orthogonal arms: door or wall continues the wall,
// void or floor ends it.
static RULES: [PatternRule; 25] = [
    rule([__, __, __, __, FL, __, __, __, __], FLOOR),
    rule([__, __, __, __, VO, __, __, __, __], SOLID),
    rule([__, DW, __, __, DO, __, __, DW, __], V_DOOR),
    rule([__, __, __, DW, DO, DW, __, __, __], H_DOOR),
    rule([__, FL, __, __, DO, __, __, FL, __], H_DOOR),
    rule([__, __, __, FL, DO, FL, __, __, __], V_DOOR),
    rule([__, __, __, __, DO, __, __, __, __], FLOOR),
    rule([WV, WV, WV, WV, WA, WV, WV, WV, WV], SOLID),
    rule([__, DW, __, DW, WA, DW, __, DW, __], JUNCTION),
    rule([__, DW, __, DW, WA, DW, __, VF, __], T_NORTH),
    rule([__, VF, __, DW, WA, DW, __, DW, __], T_SOUTH),
    rule([__, DW, __, VF, WA, DW, __, DW, __], T_EAST),
    rule([__, DW, __, DW, WA, VF, __, DW, __], T_WEST),
    rule([__, DW, __, VF, WA, VF, __, DW, __], V_WALL),
    rule([__, VF, __, DW, WA, DW, __, VF, __], H_WALL),
    rule([__, VF, __, VF, WA, DW, __, DW, __], CORNER_TOP_LEFT),
    rule([__, VF, __, DW, WA, VF, __, DW, __], CORNER_TOP_RIGHT),
    rule([__, DW, __, VF, WA, DW, __, VF, __], CORNER_BOTTOM_LEFT),
    rule([__, DW, __, DW, WA, VF, __, VF, __], CORNER_BOTTOM_RIGHT),
    rule([__, DW, __, VF, WA, VF, __, VF, __], V_WALL_END),
    rule([__, VF, __, VF, WA, VF, __, DW, __], V_WALL_END),
    rule([__, VF, __, DW, WA, VF, __, VF, __], H_WALL_END),
    rule([__, VF, __, VF, WA, DW, __, VF, __], H_WALL_END),
    rule([__, VF, __, VF, WA, VF, __, VF, __], PILLAR),
    rule([__; 9], SOLID),
];

// Back-to-back walls each see the other as an arm.
static ADJACENCY_FIXES: [AdjacencyFix; 2] = [
    AdjacencyFix {
        first: T_EAST,
        second: T_WEST,
        toward: Direction::Right,
        replacement: (V_WALL, V_WALL),
    },
    AdjacencyFix {
        first: T_SOUTH,
        second: T_NORTH,
        toward: Direction::Down,
        replacement: (H_WALL, H_WALL),
    },
];

const ALL_FLOOR_4X4: [TileId; 16] = [FLOOR; 16];

const fn stairs_replace(ids: [TileId; 4]) -> [TileId; 16] {
    [0, 0, 0, 0, 0, ids[0], ids[1], 0, 0, ids[2], ids[3], 0, 0, 0, 0, 0]
}

static UP_STAIRS_REPLACE: [TileId; 16] = stairs_replace(UP_STAIRS);
static DOWN_STAIRS_REPLACE: [TileId; 16] = stairs_replace(DOWN_STAIRS);
static WARP_STAIRS_REPLACE: [TileId; 16] = stairs_replace(WARP_STAIRS);

const fn decoration(
    name: &'static str,
    width: i32,
    height: i32,
    search: &'static [TileId],
    replace: &'static [TileId],
    percent: i32,
) -> Decoration {
    Decoration { miniset: Miniset { name, width, height, search, replace }, percent }
}

const F: TileId = FLOOR;

static DECORATIONS: [Decoration; 14] = [
    decoration("framed vertical door", 1, 3, &[V_WALL, V_DOOR, V_WALL], &[0, 45, 0], 60),
    decoration("framed horizontal door", 3, 1, &[H_WALL, H_DOOR, H_WALL], &[0, 46, 0], 60),
    decoration(
        "vertical arch",
        3,
        3,
        &[0, V_WALL, 0, F, V_WALL, F, 0, V_WALL, 0],
        &[0, 0, 0, 0, 47, 0, 0, 0, 0],
        25,
    ),
    decoration(
        "horizontal arch",
        3,
        3,
        &[0, F, 0, H_WALL, H_WALL, H_WALL, 0, F, 0],
        &[0, 0, 0, 0, 48, 0, 0, 0, 0],
        25,
    ),
    decoration(
        "rubble pillar",
        3,
        3,
        &[F, F, F, F, PILLAR, F, F, F, F],
        &[0, 0, 0, 0, 49, 0, 0, 0, 0],
        50,
    ),
    decoration("ruined floor", 2, 2, &[F, F, F, F], &[50, 51, 52, 0], 10),
    decoration("cracked vertical wall", 1, 3, &[V_WALL, V_WALL, V_WALL], &[0, 54, 0], 10),
    decoration("cracked horizontal wall", 3, 1, &[H_WALL, H_WALL, H_WALL], &[0, 55, 0], 10),
    decoration("bones", 3, 3, &[F; 9], &[0, 0, 0, 0, 56, 0, 0, 0, 0], 5),
    decoration("skull", 3, 3, &[F; 9], &[0, 0, 0, 0, 57, 0, 0, 0, 0], 5),
    decoration("blood", 3, 3, &[F; 9], &[0, 0, 0, 0, 58, 0, 0, 0, 0], 3),
    decoration("vertical torch", 2, 1, &[V_WALL, F], &[59, 0], 15),
    decoration("horizontal torch", 1, 2, &[H_WALL, F], &[60, 0], 15),
    decoration(
        "grate",
        4,
        4,
        &ALL_FLOOR_4X4,
        &[0, 0, 0, 0, 0, 61, 62, 0, 0, 63, 64, 0, 0, 0, 0, 0],
        5,
    ),
];

static SHADOWS: [ShadowTrigger; 3] = [
    ShadowTrigger {
        trigger: TileClass::VerticalDoor,
        floor_at: &[(-1, 0), (-1, -1)],
        writes: &[(-1, -1, SHADOW_CORNER), (-1, 0, SHADOW_V)],
    },
    ShadowTrigger {
        trigger: TileClass::HorizontalDoor,
        floor_at: &[(0, -1), (-1, -1)],
        writes: &[(-1, -1, SHADOW_CORNER), (0, -1, SHADOW_H)],
    },
    ShadowTrigger {
        trigger: TileClass::Pillar,
        floor_at: &[(-1, 0)],
        writes: &[(-1, 0, SHADOW_V)],
    },
];

pub(super) static TILESET: Tileset = Tileset {
    classes: &CLASSES,
    substitution_groups: &SUBSTITUTION_GROUPS,
    rules: &RULES,
    adjacency_fixes: &ADJACENCY_FIXES,
    fallback: SOLID,
    up_stairs: Stairs {
        miniset: Miniset {
            name: "up stairs",
            width: 4,
            height: 4,
            search: &ALL_FLOOR_4X4,
            replace: &UP_STAIRS_REPLACE,
        },
        view_offset: (5, 4),
    },
    down_stairs: Stairs {
        miniset: Miniset {
            name: "down stairs",
            width: 4,
            height: 4,
            search: &ALL_FLOOR_4X4,
            replace: &DOWN_STAIRS_REPLACE,
        },
        view_offset: (4, 6),
    },
    warp_stairs: Stairs {
        miniset: Miniset {
            name: "warp stairs",
            width: 4,
            height: 4,
            search: &ALL_FLOOR_4X4,
            replace: &WARP_STAIRS_REPLACE,
        },
        view_offset: (5, 4),
    },
    decorations: &DECORATIONS,
    shadows: &SHADOWS,
};
