// MR Competitors - Core Library
// Scoring engine + competitor repository, shared by the CLI, the TUI and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod registry;
pub mod report;
pub mod repository;
pub mod schema;
pub mod scoring;
pub mod transfer;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{open_database, setup_database, IN_MEMORY};
pub use entities::{BeltColor, Competitor, Gender, Name, MAX_LEVEL, MIN_LEVEL};
pub use error::{RepoError, RepoResult};
pub use registry::{Registry, StatisticalSummary};
pub use repository::{CompetitorRepository, InMemoryRepository, SqliteRepository};
pub use schema::{validate_competitor, ValidationError, ValidationResult};
pub use scoring::{compute_overall_score, SCORE_COUNT};
pub use transfer::{export_csv, import_csv, import_records, CompetitorRecord, ImportSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
