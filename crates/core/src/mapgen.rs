//! Catacombs level generation split into one submodule per pipeline stage.

pub mod model;

mod catacombs;
mod fixups;
mod generator;
mod grid;
mod hallways;
mod layout;
mod minisets;
mod patterns;
mod regions;
mod set_piece;
mod texture;
mod tileset;
mod voids;

pub use catacombs::tiles;
pub use generator::LevelRequest;
pub use grid::Grid;
pub use model::{GeneratedLevel, MinisetKind, MinisetPlacement};
pub use set_piece::SetPiece;
pub use tileset::TileClass;

use crate::error::LevelError;
use crate::types::{EntryKind, LevelType};

/// Generates a level with default configuration, no set piece and no extra
/// town warp.
pub fn generate_level(
    seed: u32,
    level_type: LevelType,
    entry: EntryKind,
) -> Result<GeneratedLevel, LevelError> {
    LevelRequest::new(seed, level_type, entry).generate()
}
