use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use archivist::config::{AppConfig, API_KEY_ENV};
use archivist::lastfm::LastfmClient;
use archivist::prune::PruneMode;

#[derive(Parser)]
#[command(name = "archivist", version, about = "Music archive maintenance toolkit")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace each track's genre with its artist's top Last.fm tags, normalized
    Genres {
        /// Directories to scan (defaults to config file music_dirs)
        paths: Vec<PathBuf>,

        /// Last.fm API key (or set LASTFM_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Number of top artist tags to use (defaults to config, 2)
        #[arg(long)]
        max_tags: Option<usize>,

        /// Preview actions without modifying files
        #[arg(long)]
        dry_run: bool,
    },

    /// Normalize tags given on the command line and print the genre field
    Expand {
        /// Raw tags, e.g. "death metal" "black/thrash"
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Detect missing or inconsistent track numbers in album folders
    Gaps {
        /// Archive root (defaults to the first config music_dirs entry)
        archive: Option<PathBuf>,

        /// Also flag albums not starting at 01 and jumps in numbering
        #[arg(long)]
        strict: bool,

        /// Show only summary statistics
        #[arg(long)]
        summary_only: bool,

        /// Report file (default: missing_tracks.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete folders that contain no audio files
    Prune {
        /// Root directory (defaults to the first config music_dirs entry)
        directory: Option<PathBuf>,

        /// Only delete folders that are empty or hold nothing but cover images
        #[arg(long)]
        cover_only: bool,

        /// Preview actions without deleting folders
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load();

    match cli.command {
        Commands::Genres { paths, api_key, max_tags, dry_run } => {
            let paths = if !paths.is_empty() {
                paths
            } else if !config.music_dirs.is_empty() {
                config.music_dirs.clone()
            } else {
                anyhow::bail!(
                    "No directories to scan. Pass paths as arguments or set music_dirs in config."
                );
            };

            let Some(key) = config.resolve_api_key(api_key) else {
                anyhow::bail!(
                    "Last.fm API key required. Use --api-key or set {API_KEY_ENV}.\n\
                     Get one at https://www.last.fm/api/account/create"
                );
            };

            let mut lastfm = config.lastfm.clone();
            if let Some(n) = max_tags {
                lastfm.max_tags = n;
            }
            let client = LastfmClient::new(key, &lastfm);

            if dry_run {
                println!("DRY RUN: no files will be modified");
            }
            let result = archivist::retag::retag(&paths, &client, dry_run);
            if result.scanned == 0 {
                println!("No audio files found.");
                return Ok(());
            }

            println!();
            println!("Summary");
            println!("=======");
            println!("Audio files scanned:          {}", result.scanned);
            println!("Genres updated:               {}", result.updated);
            println!("Skipped (no/empty top tags):  {}", result.skipped_no_tags);
            println!("Skipped (no artist tag):      {}", result.missing_artist);
            println!("Failed:                       {}", result.failed);
            println!("Dry run:                      {}", if dry_run { "Yes" } else { "No" });
        }

        Commands::Expand { tags } => {
            for tag in &tags {
                log::info!("{tag:?} -> {:?}", archivist::genre::expand(tag));
            }
            let genres = archivist::genre::aggregate(&tags);
            println!("{}", archivist::genre::genre_field(&genres));
        }

        Commands::Gaps { archive, strict, summary_only, output } => {
            let root = resolve_root(archive, &config)?;
            let strict = strict || config.gaps.strict;

            let scan = archivist::gaps::scan_archive(&root, strict);

            if summary_only {
                println!("{}", archivist::gaps::summary_line(&scan));
                return Ok(());
            }

            let report = archivist::gaps::render_report(&scan, &root, strict, chrono::Local::now());
            println!("{report}");

            let output = output
                .or(config.gaps.report_path.clone())
                .unwrap_or_else(|| PathBuf::from("missing_tracks.txt"));
            match archivist::gaps::write_report(&output, &report) {
                Ok(()) => println!("\nReport saved to: {}", output.display()),
                Err(e) => eprintln!("\nError saving report to {}: {}", output.display(), e),
            }
        }

        Commands::Prune { directory, cover_only, dry_run } => {
            let root = resolve_root(directory, &config)?;
            let mode = if cover_only { PruneMode::CoverOnly } else { PruneMode::NoAudio };
            let result = archivist::prune::prune_empty_folders(&root, mode, dry_run);

            println!();
            println!("Summary");
            println!("=======");
            println!("Folders scanned: {}", result.scanned);
            println!("Folders deleted: {}", result.removed);
            println!("Errors:          {}", result.errors);
            println!("Dry run:         {}", if dry_run { "Yes" } else { "No" });
        }
    }

    Ok(())
}

/// CLI path, else the first configured music dir.
fn resolve_root(arg: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    let root = arg
        .or_else(|| config.music_dirs.first().cloned())
        .context("No directory given. Pass one as an argument or set music_dirs in config.")?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    Ok(root)
}
