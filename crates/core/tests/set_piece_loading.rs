use std::fs;

use levelgen::{EntryKind, LevelRequest, LevelType, SetPiece, SetPieceError, SetPieceLoadError};

fn encode(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

#[test]
fn set_piece_loads_from_disk_and_generates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crypt.piece");
    let mut values = vec![5, 4];
    values.extend([6, 2, 2, 2, 8, 1, 0, 0, 0, 1, 1, 0, 14, 0, 1, 10, 2, 2, 2, 11]);
    fs::write(&path, encode(&values)).unwrap();

    let piece = SetPiece::load(&path).expect("valid set piece");
    assert_eq!((piece.width(), piece.height()), (5, 4));
    assert_eq!(piece.tile(2, 2), Some(14));

    let level = LevelRequest::new(17, LevelType::Catacombs, EntryKind::Main)
        .with_set_piece(piece)
        .generate()
        .unwrap();
    let area = level.set_piece_area.unwrap();
    assert_eq!(level.tile_at(levelgen::Pos::new(area.x1 + 2, area.y1 + 2)), 14);
}

#[test]
fn saved_set_piece_round_trips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.piece");
    let piece = SetPiece::new(3, 2, vec![1, 0, 1, 2, 2, 2]).unwrap();
    fs::write(&path, piece.to_bytes()).unwrap();
    assert_eq!(SetPiece::load(&path).unwrap(), piece);
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.piece");
    let err = SetPiece::load(&path).unwrap_err();
    assert!(matches!(err, SetPieceLoadError::Io { .. }));
    assert!(err.to_string().contains("absent.piece"));
}

#[test]
fn malformed_file_reports_the_content_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.piece");
    fs::write(&path, encode(&[4, 4, 1, 1])).unwrap();
    let err = SetPiece::load(&path).unwrap_err();
    match err {
        SetPieceLoadError::Content { source, .. } => {
            assert_eq!(source, SetPieceError::TileCountMismatch { expected: 16, actual: 2 });
        }
        other => panic!("expected a content error, got {other:?}"),
    }
}
