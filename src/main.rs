// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mr_competitors::report::{self, CompetitorView};
use mr_competitors::{
    export_csv, import_csv, AppConfig, BeltColor, Competitor, CompetitorRepository, Gender, Name,
    Registry, SqliteRepository,
};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mr-competitors",
    version,
    about = "Competitor records and trimmed-mean scoring for martial-arts events"
)]
struct Cli {
    /// Database file (":memory:" for a throwaway database)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a competitor (id is allocated when not given)
    Add {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        first: String,
        #[arg(long, default_value = "")]
        middle: String,
        #[arg(long)]
        last: String,
        /// Competition level 0-5
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
        level: u8,
        #[arg(long, value_enum, ignore_case = true)]
        gender: Gender,
        #[arg(long, value_enum, ignore_case = true)]
        belt: BeltColor,
        /// Exactly five judge scores
        #[arg(long, num_args = 5, required = true)]
        scores: Vec<u32>,
    },
    /// Change selected fields of an existing competitor
    Update {
        id: i64,
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        middle: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
        level: Option<u8>,
        #[arg(long, value_enum, ignore_case = true)]
        gender: Option<Gender>,
        #[arg(long, value_enum, ignore_case = true)]
        belt: Option<BeltColor>,
        #[arg(long, num_args = 5)]
        scores: Option<Vec<u32>>,
    },
    /// Show one competitor
    Get {
        id: i64,
        /// One-line summary instead of full details
        #[arg(long)]
        short: bool,
        #[arg(long)]
        json: bool,
    },
    /// List all competitors
    List {
        #[arg(long)]
        json: bool,
    },
    /// Competitor with the highest overall score
    Top {
        #[arg(long)]
        json: bool,
    },
    /// Delete a competitor by id
    Delete { id: i64 },
    /// Fixed-width competitor table
    Table,
    /// Total, top performer and score frequency
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Print the id the next competitor would get
    NextId,
    /// Insert competitors from a CSV file
    Import { csv: PathBuf },
    /// Write all competitors to a CSV file
    Export { csv: PathBuf },
    /// Recompute stored overall scores from raw scores
    Rescore,
    /// Browse competitors in the terminal UI
    Ui,
}

fn init_tracing(level: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // Logs go to stderr so stdout stays scriptable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(db) = cli.db.clone() {
        config.database_path = db;
    }
    init_tracing(&config.log_level, cli.verbose);
    if let Err(e) = config.ensure_database_dir() {
        warn!(error = %e, "could not prepare database directory");
    }
    debug!(database = %config.database_path.display(), "using database");

    // Connection failure degrades every command instead of aborting here
    let mut registry = Registry::new(SqliteRepository::open(&config.database_path));
    if !registry.repository().is_available() {
        eprintln!("❌ Failed to connect to the database. Results will be empty.");
    }

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Add {
            id,
            first,
            middle,
            last,
            level,
            gender,
            belt,
            scores,
        } => {
            let (id, generated) = resolve_id(&registry, id);
            if generated {
                println!("Generated Competitor ID: {}", id);
            }

            let competitor = Competitor::new(
                id,
                Name::new(first, middle, last),
                level.to_string(),
                gender,
                belt,
                scores,
            );

            if !registry.insert(&competitor) {
                bail!("competitor {} was not added", id);
            }
            println!("✓ Competitor added: {}", competitor.short_details());
        }

        Commands::Update {
            id,
            first,
            middle,
            last,
            level,
            gender,
            belt,
            scores,
        } => {
            let Some(mut competitor) = registry.find_by_id(id) else {
                println!("No competitor found with ID {}", id);
                return Ok(());
            };

            if let Some(first) = first {
                competitor.name.set_first_name(first);
            }
            if let Some(middle) = middle {
                competitor.name.set_middle_name(middle);
            }
            if let Some(last) = last {
                competitor.name.set_last_name(last);
            }
            if let Some(level) = level {
                competitor.competition_level = level.to_string();
            }
            if let Some(gender) = gender {
                competitor.gender = gender;
            }
            if let Some(belt) = belt {
                competitor.belt_color = belt;
            }
            if let Some(scores) = scores {
                competitor.scores = scores;
            }

            match registry.update(&competitor) {
                0 => println!("No competitor updated with ID {}", id),
                _ => println!("✓ Competitor with ID {} updated: {}", id, competitor.short_details()),
            }
        }

        Commands::Get { id, short, json } => match registry.find_by_id(id) {
            Some(c) if json => println!("{}", serde_json::to_string_pretty(&CompetitorView::from(&c))?),
            Some(c) if short => println!("{}", c.short_details()),
            Some(c) => print!("{}", c.full_details()),
            None => println!("No competitor found with ID {}", id),
        },

        Commands::List { json } => {
            let competitors = registry.list_all();
            if json {
                let views: Vec<CompetitorView> = competitors.iter().map(CompetitorView::from).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if competitors.is_empty() {
                println!("No competitors found.");
            } else {
                for competitor in &competitors {
                    println!("{}", competitor.full_details());
                }
            }
        }

        Commands::Top { json } => match registry.top_performer() {
            Some(c) if json => println!("{}", serde_json::to_string_pretty(&CompetitorView::from(&c))?),
            Some(c) => println!(
                "🏆 Top Performer: {} with an overall score of {:.2}",
                c.name.full_name(),
                c.overall_score()
            ),
            None => println!("No top performer found."),
        },

        Commands::Delete { id } => {
            registry.delete_by_id(id);
            println!("Delete requested for competitor ID {}", id);
        }

        Commands::Table => {
            println!("{}", report::table_header());
            for row in report::competitor_table(&registry.list_all()) {
                println!("{}", row);
            }
        }

        Commands::Stats { json } => {
            let summary = registry.statistical_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("\n--- Statistical Summary ---");
                for line in report::summary_lines(&summary) {
                    println!("{}", line);
                }
            }
        }

        Commands::NextId => println!("{}", registry.next_available_id()),

        Commands::Import { csv } => {
            let summary = import_csv(&mut registry, &csv)
                .with_context(|| format!("Failed to import {}", csv.display()))?;
            println!("✓ Inserted: {} competitors", summary.inserted);
            println!("✓ Skipped: {} rows", summary.skipped);
        }

        Commands::Export { csv } => {
            let written = export_csv(&registry.list_all(), &csv)
                .with_context(|| format!("Failed to export {}", csv.display()))?;
            println!("✓ Exported {} competitors to {}", written, csv.display());
        }

        Commands::Rescore => {
            let refreshed = registry
                .repository_mut()
                .refresh_overall_scores()
                .context("Failed to refresh overall scores")?;
            println!("✓ Refreshed {} stored overall scores", refreshed);
        }

        Commands::Ui => run_ui_mode(&registry)?,
    }

    Ok(())
}

/// Requested id, or the next free one; the flag is true when allocated here
fn resolve_id<R: CompetitorRepository>(
    registry: &Registry<R>,
    requested: Option<i64>,
) -> (i64, bool) {
    match requested {
        Some(id) => (id, false),
        None => (registry.next_available_id(), true),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(registry: &Registry<SqliteRepository>) -> Result<()> {
    let competitors = registry.list_all();
    let summary = registry.statistical_summary();

    let mut app = ui::App::new(competitors, summary);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_registry: &Registry<SqliteRepository>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
