//! Authored set pieces: parsing, validation, and stamping into a level.
//!
//! The on-disk format is a flat run of little-endian `u16` values: width,
//! height, then `width * height` tile ids in row-major order. A zero tile
//! keeps the generator's floor; anything else is written as-is and
//! protected from later passes.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{SetPieceError, SetPieceLoadError};
use crate::types::{Pos, Rect, TileId};

use super::catacombs::tiles::{FLOOR, H_DOOR, V_DOOR};
use super::grid::Grid;
use super::layout::Marker;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetPiece {
    width: u16,
    height: u16,
    tiles: Vec<TileId>,
}

impl SetPiece {
    pub fn new(width: u16, height: u16, tiles: Vec<TileId>) -> Result<Self, SetPieceError> {
        if width == 0 || height == 0 {
            return Err(SetPieceError::EmptyFootprint { width, height });
        }
        let expected = usize::from(width) * usize::from(height);
        if tiles.len() != expected {
            return Err(SetPieceError::TileCountMismatch { expected, actual: tiles.len() });
        }
        Ok(Self { width, height, tiles })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SetPieceError> {
        if bytes.len() < 4 || bytes.len() % 2 != 0 {
            return Err(SetPieceError::Truncated { len: bytes.len() });
        }
        let mut values = bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        let (Some(width), Some(height)) = (values.next(), values.next()) else {
            return Err(SetPieceError::Truncated { len: bytes.len() });
        };
        if width == 0 || height == 0 {
            return Err(SetPieceError::EmptyFootprint { width, height });
        }

        let mut tiles = Vec::with_capacity(usize::from(width) * usize::from(height));
        for (index, value) in values.enumerate() {
            let tile = TileId::try_from(value).map_err(|_| SetPieceError::TileOutOfRange {
                x: index % usize::from(width),
                y: index / usize::from(width),
                value,
            })?;
            tiles.push(tile);
        }
        Self::new(width, height, tiles)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + 2 * self.tiles.len());
        bytes.extend(self.width.to_le_bytes());
        bytes.extend(self.height.to_le_bytes());
        for &tile in &self.tiles {
            bytes.extend(u16::from(tile).to_le_bytes());
        }
        bytes
    }

    pub fn load(path: &Path) -> Result<Self, SetPieceLoadError> {
        let bytes = fs::read(path)
            .map_err(|source| SetPieceLoadError::Io { path: path.to_path_buf(), source })?;
        Self::from_bytes(&bytes)
            .map_err(|source| SetPieceLoadError::Content { path: path.to_path_buf(), source })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn tile(&self, x: u16, y: u16) -> Option<TileId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(usize::from(y) * usize::from(self.width) + usize::from(x)).copied()
    }

    /// Room spans that make the carved room, walls included, cover the piece.
    pub(super) fn room_spans(&self) -> (i32, i32) {
        (i32::from(self.width) - 1, i32::from(self.height) - 1)
    }
}

/// Door cells carved into the set-piece room's outline.
pub(super) fn perimeter_doors(markers: &Grid<Marker>, area: Rect) -> Vec<Pos> {
    area.cells()
        .filter(|pos| pos.x == area.x1 || pos.x == area.x2 || pos.y == area.y1 || pos.y == area.y2)
        .filter(|&pos| markers.get(pos) == Some(Marker::Door))
        .collect()
}

pub(super) struct SetPieceStamp<'a> {
    pub(super) set_piece: &'a SetPiece,
    pub(super) area: Rect,
    pub(super) doors: &'a [Pos],
}

impl SetPieceStamp<'_> {
    pub(super) fn apply(&self, tiles: &mut Grid<TileId>, protected: &mut Grid<bool>) {
        for dy in 0..self.set_piece.height {
            for dx in 0..self.set_piece.width {
                let Some(tile) = self.set_piece.tile(dx, dy) else {
                    continue;
                };
                let pos = Pos::new(self.area.x1 + i32::from(dx), self.area.y1 + i32::from(dy));
                if tile == 0 {
                    tiles.set(pos, FLOOR);
                } else {
                    tiles.set(pos, tile);
                    protected.set(pos, true);
                }
            }
        }
        // Hallways that reached the room keep their doors unless the piece
        // authored that cell itself.
        for &pos in self.doors {
            if self.authored_at(pos) {
                continue;
            }
            let door = if pos.x == self.area.x1 || pos.x == self.area.x2 { V_DOOR } else { H_DOOR };
            tiles.set(pos, door);
            protected.set(pos, true);
        }
    }

    fn authored_at(&self, pos: Pos) -> bool {
        let offset = (u16::try_from(pos.x - self.area.x1), u16::try_from(pos.y - self.area.y1));
        let (Ok(dx), Ok(dy)) = offset else {
            return false;
        };
        self.set_piece.tile(dx, dy).is_some_and(|tile| tile != 0)
    }
}
