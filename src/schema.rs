// 📐 Shape Layer - Schema Validation
// Rejects malformed competitors before they reach the table

use crate::entities::{Competitor, MAX_LEVEL, MIN_LEVEL};
use crate::scoring::SCORE_COUNT;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            context: "Competitor".to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

/// Checks everything the table cannot express on its own: non-empty names,
/// a level inside 0-5, and exactly five scores.
pub fn validate_competitor(competitor: &Competitor) -> ValidationResult {
    let mut errors = Vec::new();

    if competitor.id <= 0 {
        errors.push(ValidationError::new(
            "id",
            format!("Must be a positive integer, got {}", competitor.id),
        ));
    }

    if competitor.name.first_name().trim().is_empty() {
        errors.push(ValidationError::new("first_name", "Required field is empty"));
    }

    if competitor.name.last_name().trim().is_empty() {
        errors.push(ValidationError::new("last_name", "Required field is empty"));
    }

    if competitor.level().is_none() {
        errors.push(ValidationError::new(
            "competition_level",
            format!(
                "Must be an integer between {} and {}, got '{}'",
                MIN_LEVEL, MAX_LEVEL, competitor.competition_level
            ),
        ));
    }

    if competitor.scores.len() != SCORE_COUNT {
        errors.push(ValidationError::new(
            "scores",
            format!(
                "Expected exactly {} scores, got {}",
                SCORE_COUNT,
                competitor.scores.len()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
