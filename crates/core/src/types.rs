use serde::{Deserialize, Serialize};

/// Cells per side of the coarse dungeon grid.
pub const COARSE_SIZE: usize = 40;
/// Cells per side of the fine engine grid.
pub const FINE_SIZE: usize = 2 * COARSE_SIZE + 2 * FINE_ORIGIN as usize;
/// Fine-grid coordinate of coarse cell `(0, 0)`.
pub const FINE_ORIGIN: i32 = 16;

pub type TileId = u8;
pub type RegionId = u16;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Top-left fine cell of the 2×2 block this coarse cell expands into.
    pub const fn to_fine(self) -> Self {
        Self { y: 2 * self.y + FINE_ORIGIN, x: 2 * self.x + FINE_ORIGIN }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }
}

/// Inclusive rectangle in coarse coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub const fn from_size(origin: Pos, width: i32, height: i32) -> Self {
        Self { x1: origin.x, y1: origin.y, x2: origin.x + width - 1, y2: origin.y + height - 1 }
    }

    pub const fn span_x(self) -> i32 {
        self.x2 - self.x1
    }

    pub const fn span_y(self) -> i32 {
        self.y2 - self.y1
    }

    pub const fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x1 && pos.x <= self.x2 && pos.y >= self.y1 && pos.y <= self.y2
    }

    pub const fn intersects(self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y1..=self.y2).flat_map(move |y| (self.x1..=self.x2).map(move |x| Pos { y, x }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LevelType {
    Catacombs,
}

/// How the player arrives on the level; decides which stairs carry the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Descending from the level above.
    Main,
    /// Climbing back from the level below.
    Prev,
    /// Arriving through the town warp.
    TownWarp,
}
