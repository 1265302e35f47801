//! Level requests and the attempt loop that drives the pipeline.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::LevelError;
use crate::rng::{LevelRng, RandomSource};
use crate::types::{EntryKind, LevelType};

use super::layout::check_forced_size;
use super::model::GeneratedLevel;
use super::set_piece::SetPiece;

mod pipeline;
mod stairs;

/// Everything that decides a level: seed, type, entry, and the optional
/// extras layered on top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelRequest {
    seed: u32,
    level_type: LevelType,
    entry: EntryKind,
    town_warp: bool,
    set_piece: Option<SetPiece>,
    config: GeneratorConfig,
}

impl LevelRequest {
    pub fn new(seed: u32, level_type: LevelType, entry: EntryKind) -> Self {
        Self {
            seed,
            level_type,
            entry,
            town_warp: false,
            set_piece: None,
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_set_piece(mut self, set_piece: SetPiece) -> Self {
        self.set_piece = Some(set_piece);
        self
    }

    pub fn with_set_piece_bytes(self, bytes: &[u8]) -> Result<Self, LevelError> {
        Ok(self.with_set_piece(SetPiece::from_bytes(bytes)?))
    }

    /// Stamps warp stairs even when the player arrives another way.
    pub fn with_town_warp(mut self, town_warp: bool) -> Self {
        self.town_warp = town_warp;
        self
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates with the engine generator seeded from the request.
    pub fn generate(&self) -> Result<GeneratedLevel, LevelError> {
        self.generate_with(&mut LevelRng::new(self.seed))
    }

    /// Generates drawing from `rng`. Failed attempts restart with the
    /// stream carried forward, never reseeded.
    pub fn generate_with<R: RandomSource>(&self, rng: &mut R) -> Result<GeneratedLevel, LevelError> {
        if let Some(set_piece) = &self.set_piece {
            let (width, height) = set_piece.room_spans();
            check_forced_size(&self.config, width, height)?;
        }

        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            match pipeline::run_attempt(self, rng) {
                Ok(outcome) => {
                    return Ok(GeneratedLevel {
                        seed: self.seed,
                        level_type: self.level_type,
                        entry: self.entry,
                        tiles: outcome.tiles,
                        protected: outcome.protected,
                        regions: outcome.regions,
                        view: outcome.view,
                        placements: outcome.placements,
                        set_piece_area: outcome.set_piece_area,
                        attempts: attempt,
                    });
                }
                Err(failure) => debug!(attempt, %failure, "restarting level generation"),
            }
        }
        Err(LevelError::AttemptsExhausted { attempts: max_attempts })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::rng::RecordingRng;

    #[test]
    fn level_fingerprints_repeat_across_runs() {
        let cases = [
            (1_u32, EntryKind::Main),
            (1_u32, EntryKind::Prev),
            (77_u32, EntryKind::TownWarp),
            (123_456_u32, EntryKind::Main),
        ];
        for (seed, entry) in cases {
            let first = LevelRequest::new(seed, LevelType::Catacombs, entry).generate();
            let second = LevelRequest::new(seed, LevelType::Catacombs, entry).generate();
            let (first, second) = (first.expect("generates"), second.expect("generates"));
            assert_eq!(
                first.fingerprint(),
                second.fingerprint(),
                "seed={seed} entry={entry:?} must regenerate identically"
            );
        }
    }

    #[test]
    fn oversized_set_piece_is_rejected_without_drawing() {
        let piece = SetPiece::new(39, 5, vec![0; 39 * 5]).expect("valid content");
        let request =
            LevelRequest::new(5, LevelType::Catacombs, EntryKind::Main).with_set_piece(piece);
        let mut rng = RecordingRng::new(LevelRng::new(5));
        let result = request.generate_with(&mut rng);
        assert!(matches!(result, Err(LevelError::SetPieceTooLarge { width: 39, .. })));
        assert!(rng.trace().is_empty());
    }

    #[test]
    fn malformed_set_piece_bytes_surface_as_level_errors() {
        let result = LevelRequest::new(5, LevelType::Catacombs, EntryKind::Main)
            .with_set_piece_bytes(&[2, 0, 2]);
        assert!(matches!(result, Err(LevelError::SetPiece(_))));
    }

    #[test]
    fn an_impossible_config_exhausts_its_attempts() {
        let mut config = GeneratorConfig::default();
        config.hallway.step_cap = 0;
        config.max_attempts = 3;
        let result =
            LevelRequest::new(9, LevelType::Catacombs, EntryKind::Main).with_config(config).generate();
        assert_eq!(result, Err(LevelError::AttemptsExhausted { attempts: 3 }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn the_entry_stairs_always_carry_the_view(seed in any::<u32>(), entry_selector in 0_u8..=2) {
            let entry = match entry_selector {
                0 => EntryKind::Main,
                1 => EntryKind::Prev,
                _ => EntryKind::TownWarp,
            };
            let level = LevelRequest::new(seed, LevelType::Catacombs, entry).generate();
            prop_assert!(level.is_ok(), "seed={seed} entry={entry:?}: {level:?}");
            if let Ok(level) = level {
                prop_assert_eq!(level.placements.iter().filter(|p| p.sets_view).count(), 1);
            }
        }
    }
}
