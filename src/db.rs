use crate::entities::{Competitor, Name};
use crate::error::{RepoError, RepoResult};
use crate::schema::validate_competitor;
use crate::scoring::compute_overall_score;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Path value that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Column list shared by every SELECT that materializes a Competitor
const COMPETITOR_COLUMNS: &str = "competitor_id, first_name, middle_name, last_name,
    competition_level, gender, belt_color,
    score1, score2, score3, score4, score5, overall_score";

/// Open (or create) the competitor database and make sure the table exists
pub fn open_database(path: &Path) -> RepoResult<Connection> {
    let conn = if path.as_os_str() == IN_MEMORY {
        Connection::open_in_memory()?
    } else {
        let conn = Connection::open(path)?;
        // WAL for crash recovery; in-memory databases cannot use it
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn
    };

    setup_database(&conn)?;
    debug!(path = %path.display(), "competitor database ready");
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> RepoResult<()> {
    // ==========================================================================
    // Competitors Table
    // competitor_id is always supplied by the caller (no AUTOINCREMENT)
    // overall_score is a denormalized copy of the trimmed mean
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS mrcompetitors (
            competitor_id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            middle_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL,
            competition_level TEXT NOT NULL,
            gender TEXT NOT NULL,
            belt_color TEXT NOT NULL,
            score1 INTEGER NOT NULL CHECK (score1 >= 0),
            score2 INTEGER NOT NULL CHECK (score2 >= 0),
            score3 INTEGER NOT NULL CHECK (score3 >= 0),
            score4 INTEGER NOT NULL CHECK (score4 >= 0),
            score5 INTEGER NOT NULL CHECK (score5 >= 0),
            overall_score REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_overall_score ON mrcompetitors(overall_score)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// ROW MAPPING
// ============================================================================

/// Raw column values, before gender/belt text is checked against the enums
struct CompetitorRow {
    id: i64,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    competition_level: String,
    gender: String,
    belt_color: String,
    scores: Vec<u32>,
}

impl CompetitorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CompetitorRow {
            id: row.get(0)?,
            first_name: row.get(1)?,
            middle_name: row.get(2)?,
            last_name: row.get(3)?,
            competition_level: row.get(4)?,
            gender: row.get(5)?,
            belt_color: row.get(6)?,
            scores: vec![row.get(7)?, row.get(8)?, row.get(9)?, row.get(10)?, row.get(11)?],
        })
    }

    fn into_competitor(self) -> RepoResult<Competitor> {
        let gender = self.gender.parse().map_err(|_| RepoError::Decode {
            column: "gender".to_string(),
            value: self.gender.clone(),
        })?;
        let belt_color = self.belt_color.parse().map_err(|_| RepoError::Decode {
            column: "belt_color".to_string(),
            value: self.belt_color.clone(),
        })?;

        Ok(Competitor::new(
            self.id,
            Name::new(
                self.first_name,
                self.middle_name.unwrap_or_default(),
                self.last_name,
            ),
            self.competition_level,
            gender,
            belt_color,
            self.scores,
        ))
    }
}

fn query_competitors(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<Competitor>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map(params, CompetitorRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(CompetitorRow::into_competitor).collect()
}

// ============================================================================
// WRITES
// ============================================================================

pub fn insert_competitor(conn: &Connection, competitor: &Competitor) -> RepoResult<()> {
    validate_competitor(competitor)?;

    let overall_score = competitor.overall_score();
    let [s1, s2, s3, s4, s5] = competitor.score_slots();

    conn.execute(
        "INSERT INTO mrcompetitors (
            competitor_id, first_name, middle_name, last_name,
            competition_level, gender, belt_color,
            score1, score2, score3, score4, score5, overall_score
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            competitor.id,
            competitor.name.first_name(),
            competitor.name.middle_name(),
            competitor.name.last_name(),
            competitor.competition_level,
            competitor.gender.as_str(),
            competitor.belt_color.as_str(),
            s1,
            s2,
            s3,
            s4,
            s5,
            overall_score,
        ],
    )?;

    debug!(id = competitor.id, overall_score, "inserted competitor");
    Ok(())
}

/// Rewrite every column of an existing row. Returns rows affected (0 or 1).
pub fn update_competitor(conn: &Connection, competitor: &Competitor) -> RepoResult<usize> {
    validate_competitor(competitor)?;

    let overall_score = competitor.overall_score();
    let [s1, s2, s3, s4, s5] = competitor.score_slots();

    let updated = conn.execute(
        "UPDATE mrcompetitors
         SET first_name = ?1, middle_name = ?2, last_name = ?3,
             competition_level = ?4, gender = ?5, belt_color = ?6,
             score1 = ?7, score2 = ?8, score3 = ?9, score4 = ?10, score5 = ?11,
             overall_score = ?12
         WHERE competitor_id = ?13",
        params![
            competitor.name.first_name(),
            competitor.name.middle_name(),
            competitor.name.last_name(),
            competitor.competition_level,
            competitor.gender.as_str(),
            competitor.belt_color.as_str(),
            s1,
            s2,
            s3,
            s4,
            s5,
            overall_score,
            competitor.id,
        ],
    )?;

    debug!(id = competitor.id, updated, "updated competitor");
    Ok(updated)
}

pub fn delete_competitor(conn: &Connection, competitor_id: i64) -> RepoResult<usize> {
    let deleted = conn.execute(
        "DELETE FROM mrcompetitors WHERE competitor_id = ?1",
        params![competitor_id],
    )?;

    debug!(id = competitor_id, deleted, "deleted competitor");
    Ok(deleted)
}

/// Recompute the stored overall_score of every row from its raw scores.
///
/// Needed after the scoring formula changes; returns how many rows moved.
pub fn refresh_overall_scores(conn: &Connection) -> RepoResult<usize> {
    let mut stmt = conn.prepare(
        "SELECT competitor_id, score1, score2, score3, score4, score5, overall_score
         FROM mrcompetitors",
    )?;

    let rows: Vec<(i64, Vec<u32>, f64)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                vec![row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
                row.get(6)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut refreshed = 0;

    for (competitor_id, scores, stored) in rows {
        let fresh = compute_overall_score(&scores);
        if (fresh - stored).abs() > f64::EPSILON {
            conn.execute(
                "UPDATE mrcompetitors SET overall_score = ?1 WHERE competitor_id = ?2",
                params![fresh, competitor_id],
            )?;
            refreshed += 1;
        }
    }

    debug!(refreshed, "refreshed stored overall scores");
    Ok(refreshed)
}

// ============================================================================
// READS
// ============================================================================

pub fn get_competitor_by_id(conn: &Connection, competitor_id: i64) -> RepoResult<Option<Competitor>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM mrcompetitors WHERE competitor_id = ?1",
                COMPETITOR_COLUMNS
            ),
            params![competitor_id],
            CompetitorRow::from_row,
        )
        .optional()?;

    row.map(CompetitorRow::into_competitor).transpose()
}

pub fn get_all_competitors(conn: &Connection) -> RepoResult<Vec<Competitor>> {
    query_competitors(
        conn,
        &format!("SELECT {} FROM mrcompetitors", COMPETITOR_COLUMNS),
        [],
    )
}

/// Competitor with the highest stored overall_score
pub fn get_top_performer(conn: &Connection) -> RepoResult<Option<Competitor>> {
    let top = query_competitors(
        conn,
        &format!(
            "SELECT {} FROM mrcompetitors ORDER BY overall_score DESC LIMIT 1",
            COMPETITOR_COLUMNS
        ),
        [],
    )?;

    Ok(top.into_iter().next())
}

/// How often each raw score value appears across all five score slots
pub fn get_score_frequency(conn: &Connection) -> RepoResult<BTreeMap<u32, usize>> {
    let mut stmt = conn.prepare("SELECT score1, score2, score3, score4, score5 FROM mrcompetitors")?;

    let rows: Vec<[u32; 5]> = stmt
        .query_map([], |row| {
            Ok([row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?])
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut frequency = BTreeMap::new();
    for score in rows.iter().flatten() {
        *frequency.entry(*score).or_insert(0) += 1;
    }

    Ok(frequency)
}

pub fn count_competitors(conn: &Connection) -> RepoResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM mrcompetitors", [], |row| row.get(0))?;

    Ok(count as usize)
}

/// Largest allocated id, None on an empty table
pub fn get_max_competitor_id(conn: &Connection) -> RepoResult<Option<i64>> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(competitor_id) FROM mrcompetitors",
        [],
        |row| row.get(0),
    )?;

    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BeltColor, Gender};

    /// Helper function to create test competitors with all required fields
    fn create_test_competitor(id: i64, first: &str, last: &str, scores: Vec<u32>) -> Competitor {
        Competitor::new(
            id,
            Name::new(first, "", last),
            "2",
            Gender::Female,
            BeltColor::Purple,
            scores,
        )
    }

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = test_db();
        setup_database(&conn).unwrap();
        assert_eq!(count_competitors(&conn).unwrap(), 0);
    }

    #[test]
    fn test_insert_and_fetch() {
        let conn = test_db();
        let mut competitor = create_test_competitor(3, "Rosa", "Lima", vec![9, 7, 8, 6, 10]);
        competitor.name.set_middle_name("Maria");

        insert_competitor(&conn, &competitor).unwrap();

        let loaded = get_competitor_by_id(&conn, 3).unwrap().unwrap();
        assert_eq!(loaded, competitor);
        assert_eq!(loaded.name.initials(), "RML");
    }

    #[test]
    fn test_stored_overall_score_matches_formula() {
        let conn = test_db();
        insert_competitor(&conn, &create_test_competitor(1, "A", "B", vec![10, 20, 30, 40, 50])).unwrap();

        let stored: f64 = conn
            .query_row("SELECT overall_score FROM mrcompetitors WHERE competitor_id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, 30.0);
    }

    #[test]
    fn test_duplicate_id_is_constraint_violation() {
        let conn = test_db();
        let competitor = create_test_competitor(1, "A", "B", vec![1, 2, 3, 4, 5]);
        insert_competitor(&conn, &competitor).unwrap();

        let err = insert_competitor(&conn, &competitor).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count_competitors(&conn).unwrap(), 1);
    }

    #[test]
    fn test_wrong_arity_is_not_persisted() {
        let conn = test_db();
        let competitor = create_test_competitor(1, "A", "B", vec![1, 2, 3]);

        let err = insert_competitor(&conn, &competitor).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(count_competitors(&conn).unwrap(), 0);
    }

    #[test]
    fn test_update_reports_rows_affected() {
        let conn = test_db();
        let mut competitor = create_test_competitor(4, "A", "B", vec![1, 2, 3, 4, 5]);
        insert_competitor(&conn, &competitor).unwrap();

        competitor.belt_color = BeltColor::Black;
        competitor.set_score(2, 9);
        assert_eq!(update_competitor(&conn, &competitor).unwrap(), 1);

        let loaded = get_competitor_by_id(&conn, 4).unwrap().unwrap();
        assert_eq!(loaded.belt_color, BeltColor::Black);
        assert_eq!(loaded.scores, vec![1, 2, 9, 4, 5]);

        let ghost = create_test_competitor(99, "No", "One", vec![1, 2, 3, 4, 5]);
        assert_eq!(update_competitor(&conn, &ghost).unwrap(), 0);
    }

    #[test]
    fn test_max_id_and_count() {
        let conn = test_db();
        assert_eq!(get_max_competitor_id(&conn).unwrap(), None);

        insert_competitor(&conn, &create_test_competitor(3, "A", "B", vec![1, 2, 3, 4, 5])).unwrap();
        insert_competitor(&conn, &create_test_competitor(7, "C", "D", vec![1, 2, 3, 4, 5])).unwrap();

        assert_eq!(get_max_competitor_id(&conn).unwrap(), Some(7));
        assert_eq!(count_competitors(&conn).unwrap(), 2);
    }

    #[test]
    fn test_top_performer_uses_stored_score() {
        let conn = test_db();
        insert_competitor(&conn, &create_test_competitor(1, "Low", "A", vec![10, 10, 10, 10, 10])).unwrap();
        insert_competitor(&conn, &create_test_competitor(2, "High", "B", vec![30, 30, 30, 30, 30])).unwrap();
        insert_competitor(&conn, &create_test_competitor(3, "Mid", "C", vec![20, 20, 20, 20, 20])).unwrap();

        let top = get_top_performer(&conn).unwrap().unwrap();
        assert_eq!(top.id, 2);
    }

    #[test]
    fn test_score_frequency_counts_every_slot() {
        let conn = test_db();
        insert_competitor(&conn, &create_test_competitor(1, "A", "B", vec![1, 2, 3, 4, 5])).unwrap();
        insert_competitor(&conn, &create_test_competitor(2, "C", "D", vec![5, 4, 3, 2, 1])).unwrap();

        let frequency = get_score_frequency(&conn).unwrap();
        let expected: BTreeMap<u32, usize> = (1..=5).map(|s| (s, 2)).collect();
        assert_eq!(frequency, expected);
    }

    #[test]
    fn test_unknown_belt_text_is_decode_error() {
        let conn = test_db();
        insert_competitor(&conn, &create_test_competitor(1, "A", "B", vec![1, 2, 3, 4, 5])).unwrap();
        conn.execute("UPDATE mrcompetitors SET belt_color = 'Green'", []).unwrap();

        let err = get_competitor_by_id(&conn, 1).unwrap_err();
        assert!(matches!(err, RepoError::Decode { ref column, .. } if column == "belt_color"));
    }

    #[test]
    fn test_refresh_overall_scores_repairs_drift() {
        let conn = test_db();
        insert_competitor(&conn, &create_test_competitor(1, "A", "B", vec![10, 20, 30, 40, 50])).unwrap();
        insert_competitor(&conn, &create_test_competitor(2, "C", "D", vec![1, 1, 1, 1, 1])).unwrap();
        conn.execute("UPDATE mrcompetitors SET overall_score = 0 WHERE competitor_id = 1", []).unwrap();

        assert_eq!(refresh_overall_scores(&conn).unwrap(), 1);
        assert_eq!(refresh_overall_scores(&conn).unwrap(), 0);
        assert_eq!(get_top_performer(&conn).unwrap().unwrap().id, 1);
    }

    #[test]
    fn test_open_in_memory_database() {
        let conn = open_database(Path::new(IN_MEMORY)).unwrap();
        assert_eq!(count_competitors(&conn).unwrap(), 0);
    }
}
