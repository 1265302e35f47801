pub mod config;
pub mod error;
pub mod mapgen;
pub mod rng;
pub mod types;

pub use config::{GeneratorConfig, HallwayConfig, VoidConfig};
pub use error::{LevelError, SetPieceError, SetPieceLoadError};
pub use mapgen::{
    GeneratedLevel, Grid, LevelRequest, MinisetKind, MinisetPlacement, SetPiece, TileClass,
    generate_level, tiles,
};
pub use rng::{LevelRng, RandomSource, RecordingRng, ReplayRng, RngDraw};
pub use types::*;
