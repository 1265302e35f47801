use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Content problems in set-piece data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetPieceError {
    #[error("set piece is {len} bytes; expected an even number of at least 4")]
    Truncated { len: usize },

    #[error("set piece declares a {width}x{height} footprint")]
    EmptyFootprint { width: u16, height: u16 },

    #[error("set piece declares {expected} tiles but carries {actual}")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("set piece tile {value} at ({x}, {y}) does not fit in a tile id")]
    TileOutOfRange { x: usize, y: usize, value: u16 },
}

/// Reading a set piece from disk.
#[derive(Error, Debug)]
pub enum SetPieceLoadError {
    #[error("failed to read set piece {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid set piece {}", path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: SetPieceError,
    },
}

/// Failures surfaced to the caller of level generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error(transparent)]
    SetPiece(#[from] SetPieceError),

    #[error(
        "set piece room needs {width}x{height} but the root region only allows {max_width}x{max_height}"
    )]
    SetPieceTooLarge { width: i32, height: i32, max_width: i32, max_height: i32 },

    #[error("set piece room needs at least 2x2 cells but the piece is {width}x{height}")]
    SetPieceTooSmall { width: i32, height: i32 },

    #[error("level generation did not succeed within {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// Conditions that abandon the current attempt; the driver restarts from
/// scratch with the random stream carried forward.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttemptFailure {
    #[error("hallway did not reach its target within {steps} steps")]
    HallwayUnreachable { steps: u32 },

    #[error("no valid position for the {miniset} miniset within {tries} tries")]
    MinisetPlacement { miniset: &'static str, tries: u32 },
}
