// 🗄️ Competitor Repository - persistence abstraction
//
// The trait keeps success-with-nothing (Ok(None), Ok(0), empty Vec) apart
// from failure (Err). Callers that want the forgiving behavior wrap a
// repository in `registry::Registry`.

use crate::db;
use crate::entities::Competitor;
use crate::error::{RepoError, RepoResult};
use crate::schema::validate_competitor;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::error;

pub trait CompetitorRepository {
    fn insert(&mut self, competitor: &Competitor) -> RepoResult<()>;

    /// Rows affected: 0 when no competitor has this id, otherwise 1
    fn update(&mut self, competitor: &Competitor) -> RepoResult<usize>;

    /// Rows affected: 0 when the id was not present
    fn delete_by_id(&mut self, competitor_id: i64) -> RepoResult<usize>;

    fn find_by_id(&self, competitor_id: i64) -> RepoResult<Option<Competitor>>;

    fn list_all(&self) -> RepoResult<Vec<Competitor>>;

    fn top_performer(&self) -> RepoResult<Option<Competitor>>;

    fn score_frequency(&self) -> RepoResult<BTreeMap<u32, usize>>;

    fn total_count(&self) -> RepoResult<usize>;

    /// `max(id) + 1`, or 1 on an empty store. Single-writer only.
    fn next_available_id(&self) -> RepoResult<i64>;
}

/// Id following `max`; fails once `i64::MAX` is taken
fn id_after(max: Option<i64>) -> RepoResult<i64> {
    match max {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(RepoError::IdExhausted { max }),
    }
}

// ============================================================================
// SQLITE REPOSITORY
// ============================================================================

/// Repository over one long-lived SQLite connection supplied by the caller.
///
/// A repository built with `unavailable` has no connection: every operation
/// returns `RepoError::Unavailable`.
pub struct SqliteRepository {
    conn: Option<Connection>,
    unavailable_reason: String,
}

impl SqliteRepository {
    pub fn new(conn: Connection) -> Self {
        SqliteRepository {
            conn: Some(conn),
            unavailable_reason: String::new(),
        }
    }

    /// Degraded repository: storage could not be reached at startup
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SqliteRepository {
            conn: None,
            unavailable_reason: reason.into(),
        }
    }

    /// Open the database at `path`; on failure, log and fall back to a
    /// degraded repository instead of aborting the session
    pub fn open(path: &Path) -> Self {
        match db::open_database(path) {
            Ok(conn) => SqliteRepository::new(conn),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open competitor database");
                SqliteRepository::unavailable(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    /// Recompute the denormalized overall_score column for every row
    pub fn refresh_overall_scores(&mut self) -> RepoResult<usize> {
        db::refresh_overall_scores(self.conn()?)
    }

    fn conn(&self) -> RepoResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| RepoError::unavailable(self.unavailable_reason.clone()))
    }
}

impl CompetitorRepository for SqliteRepository {
    fn insert(&mut self, competitor: &Competitor) -> RepoResult<()> {
        db::insert_competitor(self.conn()?, competitor)
    }

    fn update(&mut self, competitor: &Competitor) -> RepoResult<usize> {
        db::update_competitor(self.conn()?, competitor)
    }

    fn delete_by_id(&mut self, competitor_id: i64) -> RepoResult<usize> {
        db::delete_competitor(self.conn()?, competitor_id)
    }

    fn find_by_id(&self, competitor_id: i64) -> RepoResult<Option<Competitor>> {
        db::get_competitor_by_id(self.conn()?, competitor_id)
    }

    fn list_all(&self) -> RepoResult<Vec<Competitor>> {
        db::get_all_competitors(self.conn()?)
    }

    fn top_performer(&self) -> RepoResult<Option<Competitor>> {
        db::get_top_performer(self.conn()?)
    }

    fn score_frequency(&self) -> RepoResult<BTreeMap<u32, usize>> {
        db::get_score_frequency(self.conn()?)
    }

    fn total_count(&self) -> RepoResult<usize> {
        db::count_competitors(self.conn()?)
    }

    fn next_available_id(&self) -> RepoResult<i64> {
        id_after(db::get_max_competitor_id(self.conn()?)?)
    }
}

// ============================================================================
// IN-MEMORY REPOSITORY
// ============================================================================

/// Test double keyed by id. Overall score is computed on read, so there is
/// no stored copy that could drift from the formula.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    competitors: BTreeMap<i64, Competitor>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompetitorRepository for InMemoryRepository {
    fn insert(&mut self, competitor: &Competitor) -> RepoResult<()> {
        validate_competitor(competitor)?;

        if self.competitors.contains_key(&competitor.id) {
            return Err(RepoError::Duplicate { id: competitor.id });
        }

        self.competitors.insert(competitor.id, competitor.clone());
        Ok(())
    }

    fn update(&mut self, competitor: &Competitor) -> RepoResult<usize> {
        validate_competitor(competitor)?;

        match self.competitors.get_mut(&competitor.id) {
            Some(existing) => {
                *existing = competitor.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_by_id(&mut self, competitor_id: i64) -> RepoResult<usize> {
        Ok(usize::from(self.competitors.remove(&competitor_id).is_some()))
    }

    fn find_by_id(&self, competitor_id: i64) -> RepoResult<Option<Competitor>> {
        Ok(self.competitors.get(&competitor_id).cloned())
    }

    fn list_all(&self) -> RepoResult<Vec<Competitor>> {
        Ok(self.competitors.values().cloned().collect())
    }

    fn top_performer(&self) -> RepoResult<Option<Competitor>> {
        // max_by keeps the last of equal elements; iterate in reverse so
        // ties resolve to the lowest id
        Ok(self
            .competitors
            .values()
            .rev()
            .max_by(|a, b| a.overall_score().total_cmp(&b.overall_score()))
            .cloned())
    }

    fn score_frequency(&self) -> RepoResult<BTreeMap<u32, usize>> {
        let mut frequency = BTreeMap::new();
        for competitor in self.competitors.values() {
            for score in competitor.score_slots() {
                *frequency.entry(score).or_insert(0) += 1;
            }
        }
        Ok(frequency)
    }

    fn total_count(&self) -> RepoResult<usize> {
        Ok(self.competitors.len())
    }

    fn next_available_id(&self) -> RepoResult<i64> {
        id_after(self.competitors.keys().next_back().copied())
    }
}
