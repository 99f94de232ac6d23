// 📦 CSV import / export of competitor rows
//
// One flat row per competitor with the same columns as the table. An empty
// competitor_id on import means "allocate the next free id".

use crate::entities::{Competitor, Name};
use crate::error::RepoResult;
use crate::registry::Registry;
use crate::repository::CompetitorRepository;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    #[serde(default)]
    pub competitor_id: Option<i64>,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub competition_level: String,
    pub gender: String,
    pub belt_color: String,
    pub score1: u32,
    pub score2: u32,
    pub score3: u32,
    pub score4: u32,
    pub score5: u32,
}

impl CompetitorRecord {
    /// Build the entity, using `id` for the competitor number
    pub fn into_competitor(self, id: i64) -> Result<Competitor, String> {
        let gender = self.gender.parse()?;
        let belt_color = self.belt_color.parse()?;

        Ok(Competitor::new(
            id,
            Name::new(self.first_name, self.middle_name, self.last_name),
            self.competition_level,
            gender,
            belt_color,
            vec![self.score1, self.score2, self.score3, self.score4, self.score5],
        ))
    }
}

impl From<&Competitor> for CompetitorRecord {
    fn from(competitor: &Competitor) -> Self {
        let [score1, score2, score3, score4, score5] = competitor.score_slots();
        CompetitorRecord {
            competitor_id: Some(competitor.id),
            first_name: competitor.name.first_name().to_string(),
            middle_name: competitor.name.middle_name().to_string(),
            last_name: competitor.name.last_name().to_string(),
            competition_level: competitor.competition_level.clone(),
            gender: competitor.gender.as_str().to_string(),
            belt_color: competitor.belt_color.as_str().to_string(),
            score1,
            score2,
            score3,
            score4,
            score5,
        }
    }
}

/// Outcome of one import run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Strict read: the first malformed row is an error
pub fn read_records<R: io::Read>(reader: R) -> RepoResult<Vec<CompetitorRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let records = rdr
        .deserialize()
        .collect::<Result<Vec<CompetitorRecord>, _>>()?;

    Ok(records)
}

/// Insert every row of a CSV file. Rows that cannot be parsed or persisted
/// are counted as skipped; only an unreadable file is an error.
pub fn import_csv<R: CompetitorRepository>(
    registry: &mut Registry<R>,
    csv_path: &Path,
) -> RepoResult<ImportSummary> {
    let file = std::fs::File::open(csv_path)?;
    let summary = import_records(registry, file);

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        path = %csv_path.display(),
        "import finished"
    );
    Ok(summary)
}

/// Row-by-row import from any reader; a bad row never stops the rest
pub fn import_records<R: CompetitorRepository, Rd: io::Read>(
    registry: &mut Registry<R>,
    reader: Rd,
) -> ImportSummary {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut summary = ImportSummary::default();

    for (index, result) in rdr.deserialize::<CompetitorRecord>().enumerate() {
        let row = index + 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line());
                warn!(row, ?line, error = %e, "skipping malformed row");
                summary.skipped += 1;
                continue;
            }
        };

        let id = record
            .competitor_id
            .unwrap_or_else(|| registry.next_available_id());

        let competitor = match record.into_competitor(id) {
            Ok(c) => c,
            Err(reason) => {
                warn!(row, %reason, "skipping unparseable row");
                summary.skipped += 1;
                continue;
            }
        };

        if registry.insert(&competitor) {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
    }

    summary
}

pub fn write_records<W: io::Write>(writer: W, competitors: &[Competitor]) -> RepoResult<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    for competitor in competitors {
        wtr.serialize(CompetitorRecord::from(competitor))?;
    }

    wtr.flush()?;
    Ok(competitors.len())
}

pub fn export_csv(competitors: &[Competitor], csv_path: &Path) -> RepoResult<usize> {
    let file = std::fs::File::create(csv_path)?;
    let written = write_records(file, competitors)?;

    info!(written, path = %csv_path.display(), "export finished");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BeltColor, Gender};
    use crate::repository::InMemoryRepository;

    const SAMPLE: &str = "\
competitor_id,first_name,middle_name,last_name,competition_level,gender,belt_color,score1,score2,score3,score4,score5
,Ana,,Silva,2,female,Blue,3,4,5,4,3
10,Bo,Jin,Kwon,5,Male,Black,9,9,8,10,7
";

    #[test]
    fn test_read_records() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].competitor_id, None);
        assert_eq!(records[0].middle_name, "");
        assert_eq!(records[1].competitor_id, Some(10));
    }

    #[test]
    fn test_record_into_competitor() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        let competitor = records[0].clone().into_competitor(4).unwrap();

        assert_eq!(competitor.id, 4);
        assert_eq!(competitor.gender, Gender::Female);
        assert_eq!(competitor.belt_color, BeltColor::Blue);
        assert_eq!(competitor.scores, vec![3, 4, 5, 4, 3]);
    }

    #[test]
    fn test_bad_belt_is_rejected() {
        let mut record = read_records(SAMPLE.as_bytes()).unwrap().remove(0);
        record.belt_color = "Green".to_string();
        assert!(record.into_competitor(1).is_err());
    }

    #[test]
    fn test_import_skips_rows_with_unreadable_scores() {
        let input = "\
competitor_id,first_name,middle_name,last_name,competition_level,gender,belt_color,score1,score2,score3,score4,score5
1,Ana,,Silva,2,Female,Blue,3,4,5,4,3
2,Neg,,Score,2,Male,Blue,-1,4,5,4,3
3,Not,,Number,2,Male,Blue,abc,4,5,4,3
4,Bo,,Kwon,5,Male,Black,9,9,8,10,7
";
        let mut registry = Registry::new(InMemoryRepository::new());
        let summary = import_records(&mut registry, input.as_bytes());

        assert_eq!(summary, ImportSummary { inserted: 2, skipped: 2 });
        assert!(registry.find_by_id(1).is_some());
        assert!(registry.find_by_id(2).is_none());
        assert!(registry.find_by_id(3).is_none());
        assert!(registry.find_by_id(4).is_some());
    }

    #[test]
    fn test_import_csv_missing_file_is_an_error() {
        let mut registry = Registry::new(InMemoryRepository::new());
        let result = import_csv(&mut registry, Path::new("/nonexistent-dir/entries.csv"));

        assert!(matches!(result, Err(crate::error::RepoError::Io(_))));
    }

    #[test]
    fn test_write_records_keeps_header_and_rows() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        let competitor = records[1].clone().into_competitor(10).unwrap();

        let mut out = Vec::new();
        assert_eq!(write_records(&mut out, &[competitor]).unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("competitor_id,first_name"));
        assert_eq!(lines.next().unwrap(), "10,Bo,Jin,Kwon,5,Male,Black,9,9,8,10,7");
    }
}
