// 🧾 Registry - forgiving boundary over a CompetitorRepository
//
// No operation here fails. Each error is logged, then turned into the empty,
// zero or absent value documented for that operation, so one bad query
// never ends an interactive session. Callers that need to tell "nothing
// there" from "storage broke" use the repository directly.

use crate::entities::Competitor;
use crate::error::RepoError;
use crate::repository::CompetitorRepository;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Totals shown by the `stats` command
#[derive(Debug, Clone, Serialize)]
pub struct StatisticalSummary {
    pub total: usize,
    pub top_performer: Option<Competitor>,
    /// Raw score value -> occurrences, ascending by score
    pub score_frequency: BTreeMap<u32, usize>,
}

impl StatisticalSummary {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

pub struct Registry<R: CompetitorRepository> {
    repo: R,
}

impl<R: CompetitorRepository> Registry<R> {
    pub fn new(repo: R) -> Self {
        Registry { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Persist a new competitor. Returns false when nothing was written.
    pub fn insert(&mut self, competitor: &Competitor) -> bool {
        match self.repo.insert(competitor) {
            Ok(()) => {
                info!(id = competitor.id, "competitor added");
                true
            }
            Err(e) => {
                log_failure("insert", &e);
                false
            }
        }
    }

    /// Rows updated: 0 when the id is unknown or the write failed
    pub fn update(&mut self, competitor: &Competitor) -> usize {
        match self.repo.update(competitor) {
            Ok(0) => {
                warn!(id = competitor.id, "no competitor found to update");
                0
            }
            Ok(updated) => {
                info!(id = competitor.id, "competitor updated");
                updated
            }
            Err(e) => {
                log_failure("update", &e);
                0
            }
        }
    }

    /// Deleting an unknown id is a no-op
    pub fn delete_by_id(&mut self, competitor_id: i64) {
        match self.repo.delete_by_id(competitor_id) {
            Ok(0) => info!(id = competitor_id, "no competitor to delete"),
            Ok(_) => info!(id = competitor_id, "competitor deleted"),
            Err(e) => log_failure("delete", &e),
        }
    }

    pub fn find_by_id(&self, competitor_id: i64) -> Option<Competitor> {
        self.repo.find_by_id(competitor_id).unwrap_or_else(|e| {
            log_failure("find_by_id", &e);
            None
        })
    }

    pub fn list_all(&self) -> Vec<Competitor> {
        self.repo.list_all().unwrap_or_else(|e| {
            log_failure("list_all", &e);
            Vec::new()
        })
    }

    pub fn top_performer(&self) -> Option<Competitor> {
        self.repo.top_performer().unwrap_or_else(|e| {
            log_failure("top_performer", &e);
            None
        })
    }

    pub fn score_frequency(&self) -> BTreeMap<u32, usize> {
        self.repo.score_frequency().unwrap_or_else(|e| {
            log_failure("score_frequency", &e);
            BTreeMap::new()
        })
    }

    /// 0 both for an empty table and for a failed query
    pub fn total_count(&self) -> usize {
        self.repo.total_count().unwrap_or_else(|e| {
            log_failure("total_count", &e);
            0
        })
    }

    /// Falls back to 1 when the max id cannot be read or is already i64::MAX
    pub fn next_available_id(&self) -> i64 {
        self.repo.next_available_id().unwrap_or_else(|e| {
            log_failure("next_available_id", &e);
            1
        })
    }

    pub fn statistical_summary(&self) -> StatisticalSummary {
        StatisticalSummary {
            total: self.total_count(),
            top_performer: self.top_performer(),
            score_frequency: self.score_frequency(),
        }
    }
}

fn log_failure(operation: &str, e: &RepoError) {
    match e {
        RepoError::Validation(_) => warn!(operation, error = %e, "rejected malformed competitor"),
        RepoError::Unavailable { .. } => warn!(operation, error = %e, "storage unavailable"),
        _ if e.is_constraint_violation() => warn!(operation, error = %e, "constraint violation"),
        _ => error!(operation, error = %e, "storage operation failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BeltColor, Gender, Name};
    use crate::repository::{InMemoryRepository, SqliteRepository};

    fn competitor(id: i64, scores: Vec<u32>) -> Competitor {
        Competitor::new(
            id,
            Name::new("Lee", "", "Chan"),
            "4",
            Gender::Female,
            BeltColor::Black,
            scores,
        )
    }

    #[test]
    fn test_degraded_registry_never_fails() {
        let mut registry = Registry::new(SqliteRepository::unavailable("offline"));

        assert!(!registry.insert(&competitor(1, vec![1, 2, 3, 4, 5])));
        assert_eq!(registry.update(&competitor(1, vec![1, 2, 3, 4, 5])), 0);
        registry.delete_by_id(1);
        assert!(registry.find_by_id(1).is_none());
        assert!(registry.list_all().is_empty());
        assert!(registry.top_performer().is_none());
        assert!(registry.score_frequency().is_empty());
        assert_eq!(registry.total_count(), 0);
        assert_eq!(registry.next_available_id(), 1);
        assert!(registry.statistical_summary().is_empty());
    }

    #[test]
    fn test_malformed_insert_reports_false() {
        let mut registry = Registry::new(InMemoryRepository::new());

        assert!(!registry.insert(&competitor(1, vec![1, 2])));
        assert_eq!(registry.total_count(), 0);
    }

    #[test]
    fn test_duplicate_insert_reports_false() {
        let mut registry = Registry::new(InMemoryRepository::new());

        assert!(registry.insert(&competitor(1, vec![1, 2, 3, 4, 5])));
        assert!(!registry.insert(&competitor(1, vec![5, 4, 3, 2, 1])));
        assert_eq!(registry.find_by_id(1).unwrap().scores, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_next_id_after_largest_id_falls_back() {
        let mut registry = Registry::new(InMemoryRepository::new());
        assert!(registry.insert(&competitor(i64::MAX, vec![1, 2, 3, 4, 5])));

        assert_eq!(registry.next_available_id(), 1);
        assert_eq!(registry.total_count(), 1);
    }

    #[test]
    fn test_delete_unknown_id_leaves_others() {
        let mut registry = Registry::new(InMemoryRepository::new());
        registry.insert(&competitor(1, vec![1, 2, 3, 4, 5]));

        registry.delete_by_id(99);
        assert!(registry.find_by_id(1).is_some());
    }

    #[test]
    fn test_statistical_summary() {
        let mut registry = Registry::new(InMemoryRepository::new());
        registry.insert(&competitor(1, vec![1, 2, 3, 4, 5]));
        registry.insert(&competitor(2, vec![5, 4, 3, 2, 5]));

        let summary = registry.statistical_summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.top_performer.unwrap().id, 2);
        assert_eq!(summary.score_frequency.get(&5), Some(&3));
        assert_eq!(summary.score_frequency.values().sum::<usize>(), 10);
    }
}
