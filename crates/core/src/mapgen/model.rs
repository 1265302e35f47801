//! Public data model for a generated level.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{EntryKind, LevelType, Pos, Rect, RegionId, TileId};

use super::grid::Grid;
use super::tileset::{TileClass, tileset};

/// Which mandatory template a placement stamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MinisetKind {
    UpStairs,
    DownStairs,
    WarpStairs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MinisetPlacement {
    pub kind: MinisetKind,
    /// Top-left coarse cell of the stamped template.
    pub anchor: Pos,
    /// Whether this placement decided the arrival view.
    pub sets_view: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedLevel {
    pub seed: u32,
    pub level_type: LevelType,
    pub entry: EntryKind,
    pub tiles: Grid<TileId>,
    pub protected: Grid<bool>,
    /// Fine-grid visibility regions; zero is unassigned.
    pub regions: Grid<RegionId>,
    /// Fine-grid position the player arrives at.
    pub view: Pos,
    pub placements: Vec<MinisetPlacement>,
    pub set_piece_area: Option<Rect>,
    /// Attempts consumed, including the successful one.
    pub attempts: u32,
}

impl GeneratedLevel {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        bytes.push(match self.level_type {
            LevelType::Catacombs => 2,
        });
        bytes.push(match self.entry {
            EntryKind::Main => 0,
            EntryKind::Prev => 1,
            EntryKind::TownWarp => 2,
        });
        bytes.extend(self.tiles.cells());
        for &protected in self.protected.cells() {
            bytes.push(u8::from(protected));
        }
        for region in self.regions.cells() {
            bytes.extend(region.to_le_bytes());
        }
        bytes.extend(self.view.y.to_le_bytes());
        bytes.extend(self.view.x.to_le_bytes());

        bytes.extend((self.placements.len() as u32).to_le_bytes());
        for placement in &self.placements {
            bytes.push(match placement.kind {
                MinisetKind::UpStairs => 0,
                MinisetKind::DownStairs => 1,
                MinisetKind::WarpStairs => 2,
            });
            bytes.extend(placement.anchor.y.to_le_bytes());
            bytes.extend(placement.anchor.x.to_le_bytes());
            bytes.push(u8::from(placement.sets_view));
        }

        match self.set_piece_area {
            Some(area) => {
                bytes.push(1);
                for value in [area.x1, area.y1, area.x2, area.y2] {
                    bytes.extend(value.to_le_bytes());
                }
            }
            None => bytes.push(0),
        }
        bytes
    }

    /// Stable hash of [`Self::canonical_bytes`]. The attempt count is left
    /// out so that only the level itself is compared.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Tile at a coarse position; out-of-grid reads return `0`.
    pub fn tile_at(&self, pos: Pos) -> TileId {
        self.tiles.get(pos).unwrap_or(0)
    }

    pub fn tile_class_at(&self, pos: Pos) -> TileClass {
        tileset(self.level_type).class_of(self.tile_at(pos))
    }

    pub fn is_protected(&self, pos: Pos) -> bool {
        self.protected.get(pos).unwrap_or(false)
    }

    /// Region id at a fine-grid position.
    pub fn region_at(&self, fine: Pos) -> RegionId {
        self.regions.get(fine).unwrap_or(0)
    }

    pub fn placement(&self, kind: MinisetKind) -> Option<&MinisetPlacement> {
        self.placements.iter().find(|placement| placement.kind == kind)
    }

    /// One character per coarse cell, rows separated by newlines.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.width() * (self.tiles.height() + 1));
        for y in 0..self.tiles.height() as i32 {
            for x in 0..self.tiles.width() as i32 {
                out.push(glyph(self.tile_class_at(Pos::new(x, y))));
            }
            out.push('\n');
        }
        out
    }
}

fn glyph(class: TileClass) -> char {
    match class {
        TileClass::None => '?',
        TileClass::Floor => '.',
        TileClass::VerticalWall => '|',
        TileClass::HorizontalWall => '-',
        TileClass::Corner | TileClass::Junction => '+',
        TileClass::Pillar => 'o',
        TileClass::VerticalDoor | TileClass::HorizontalDoor => 'D',
        TileClass::Solid => ' ',
        TileClass::UpStairs => '<',
        TileClass::DownStairs => '>',
        TileClass::WarpStairs => '*',
    }
}
