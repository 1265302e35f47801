use std::collections::BTreeSet;

use anyhow::{Result, bail};
use clap::Parser;
use levelgen::{
    COARSE_SIZE, EntryKind, GeneratedLevel, LevelRequest, LevelRng, LevelType, MinisetKind, Pos,
    TileClass,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of levels to generate
    #[arg(short, long, default_value_t = 200)]
    levels: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(level: &GeneratedLevel) -> Result<()> {
    let views = level.placements.iter().filter(|placement| placement.sets_view).count();
    if views != 1 {
        bail!("expected exactly one view placement, found {views}");
    }
    let anchors: BTreeSet<Pos> = level.placements.iter().map(|placement| placement.anchor).collect();
    if anchors.len() != level.placements.len() {
        bail!("two mandatory placements share an anchor");
    }
    for kind in [MinisetKind::UpStairs, MinisetKind::DownStairs] {
        if level.placement(kind).is_none() {
            bail!("missing {kind:?}");
        }
    }
    for y in 0..COARSE_SIZE as i32 {
        for x in 0..COARSE_SIZE as i32 {
            let pos = Pos::new(x, y);
            if level.tile_class_at(pos) == TileClass::Floor && level.region_at(pos.to_fine()) == 0 {
                bail!("floor at {pos:?} has no visibility region");
            }
            if level.tile_class_at(pos) == TileClass::None {
                bail!("unknown tile {} at {pos:?}", level.tile_at(pos));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    info!(seed = args.seed, levels = args.levels, "starting level fuzz");
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut retried = 0_u32;

    for _ in 0..args.levels {
        let level_seed = rng.next_u32();
        let entry = choose(&mut rng, &[EntryKind::Main, EntryKind::Prev, EntryKind::TownWarp]);
        let town_warp = rng.next_u32() % 4 == 0;
        let request =
            LevelRequest::new(level_seed, LevelType::Catacombs, entry).with_town_warp(town_warp);

        let mut first_rng = LevelRng::new(level_seed);
        let level = request.generate_with(&mut first_rng)?;
        check_invariants(&level)
            .map_err(|err| err.context(format!("seed {level_seed} entry {entry:?}")))?;

        let mut second_rng = LevelRng::new(level_seed);
        let again = request.generate_with(&mut second_rng)?;
        if again.fingerprint() != level.fingerprint() || first_rng.draws() != second_rng.draws() {
            bail!("seed {level_seed} entry {entry:?} is not deterministic");
        }

        if level.attempts > 1 {
            retried += 1;
        }
        debug!(level_seed, ?entry, attempts = level.attempts, "level checked");
    }

    info!(levels = args.levels, retried, "fuzzing completed successfully");
    Ok(())
}
