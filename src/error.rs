// ⚠️ Error types for repository operations
//
// Every storage failure is a value here. The forgiving behavior the CLI
// wants lives one layer up, in `registry`.

use crate::schema::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    /// Storage could not be opened when the repository was built
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    /// Write rejected before reaching storage
    #[error("invalid competitor: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// Row holds a value the entity model cannot represent
    #[error("cannot decode column '{column}' with value '{value}'")]
    Decode { column: String, value: String },

    /// A competitor with this id is already stored
    #[error("duplicate competitor id {id}")]
    Duplicate { id: i64 },

    /// No id above the current maximum fits in an i64
    #[error("no competitor id left after {max}")]
    IdExhausted { max: i64 },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

impl RepoError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        RepoError::Unavailable {
            reason: reason.into(),
        }
    }

    /// True for duplicate ids and for primary key / CHECK violations
    /// reported by SQLite
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            RepoError::Duplicate { .. } => true,
            RepoError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

impl From<Vec<ValidationError>> for RepoError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RepoError::Validation(errors)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
