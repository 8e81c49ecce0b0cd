//! Midigen CLI: render a song config to a MIDI file, or inspect one.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use midigen::config::{load_config, SongConfig};
use midigen::engine::generate_seeded;
use midigen::midi::{inspect, write_midi};

#[derive(Parser)]
#[command(name = "midigen")]
#[command(about = "Generate MIDI files from declarative song configs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a MIDI file from a JSON or YAML config
    Generate {
        /// Song config (.json, .yaml, .yml)
        config: PathBuf,

        /// Output MIDI path (default: metadata.output_filename, then <title>.mid)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Humanization seed (default: metadata.seed, then random)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the events of a MIDI file
    Inspect {
        /// MIDI file to read
        file: PathBuf,

        /// Maximum events shown per track
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate {
            config,
            output,
            seed,
        } => run_generate(&config, output, seed),
        Commands::Inspect { file, limit } => run_inspect(&file, limit),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_generate(
    path: &Path,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let seed = seed
        .or(config.metadata.seed)
        .unwrap_or_else(rand::random::<u64>);
    info!(seed, config = %path.display(), "generating");

    let song = generate_seeded(&config, seed)?;
    let output = output.unwrap_or_else(|| default_output(&config));
    write_midi(&song, &output)?;

    let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    println!("saved {} ({size} bytes)", output.display());

    let stats = song.stats();
    println!();
    println!("Title:        {}", stats.title);
    println!("Tempo:        {} BPM", stats.tempo);
    println!("Total notes:  {}", stats.total_notes);
    println!("Total tracks: {}", stats.total_tracks);
    println!("Length:       {} ticks", stats.end_tick);
    println!();
    for track in &stats.tracks {
        println!("  {:<16} ch {:>2}  {} notes", track.name, track.channel, track.notes);
    }
    Ok(())
}

fn run_inspect(path: &Path, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    println!("{}", path.display());
    for line in inspect(&bytes, limit)? {
        println!("{line}");
    }
    Ok(())
}

fn default_output(config: &SongConfig) -> PathBuf {
    match &config.metadata.output_filename {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(format!("{}.mid", config.metadata.title)),
    }
}
