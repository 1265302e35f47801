use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use levelgen::{EntryKind, GeneratedLevel, GeneratorConfig, LevelRequest, LevelType, SetPiece};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Entry {
    Main,
    Prev,
    TownWarp,
}

impl From<Entry> for EntryKind {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Main => EntryKind::Main,
            Entry::Prev => EntryKind::Prev,
            Entry::TownWarp => EntryKind::TownWarp,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a Catacombs level and print it", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 1)]
    seed: u32,
    #[arg(short, long, value_enum, default_value_t = Entry::Main)]
    entry: Entry,
    /// Also stamp warp stairs when arriving another way
    #[arg(long)]
    town_warp: bool,
    /// TOML file overriding generator tunables
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Binary set piece stamped into the root room
    #[arg(long)]
    set_piece: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn print_text(level: &GeneratedLevel) {
    print!("{}", level.render_ascii());
    println!("Seed: {}", level.seed);
    println!("Entry: {:?}", level.entry);
    println!("View: ({}, {})", level.view.x, level.view.y);
    for placement in &level.placements {
        let marker = if placement.sets_view { " (view)" } else { "" };
        println!(
            "{:?} at ({}, {}){marker}",
            placement.kind, placement.anchor.x, placement.anchor.y
        );
    }
    println!("Attempts: {}", level.attempts);
    println!("Fingerprint: {:016x}", level.fingerprint());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut request = LevelRequest::new(args.seed, LevelType::Catacombs, args.entry.into())
        .with_town_warp(args.town_warp);
    if let Some(path) = &args.config {
        request = request.with_config(load_config(path)?);
    }
    if let Some(path) = &args.set_piece {
        request = request.with_set_piece(SetPiece::load(path)?);
    }

    let level = request.generate().context("Level generation failed")?;
    info!(seed = level.seed, attempts = level.attempts, "level generated");

    match args.format {
        Format::Text => print_text(&level),
        Format::Json => {
            let json = serde_json::to_string_pretty(&level)
                .context("Failed to serialize level as JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}
