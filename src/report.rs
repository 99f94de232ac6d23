// 📋 Plain-text and JSON rendering for CLI output

use crate::entities::Competitor;
use crate::registry::StatisticalSummary;
use serde::Serialize;
use std::collections::BTreeMap;

/// Competitor plus its derived values, for JSON output
#[derive(Debug, Serialize)]
pub struct CompetitorView<'a> {
    #[serde(flatten)]
    pub competitor: &'a Competitor,
    pub full_name: String,
    pub initials: String,
    pub overall_score: f64,
}

impl<'a> From<&'a Competitor> for CompetitorView<'a> {
    fn from(competitor: &'a Competitor) -> Self {
        CompetitorView {
            competitor,
            full_name: competitor.name.full_name(),
            initials: competitor.name.initials(),
            overall_score: competitor.overall_score(),
        }
    }
}

pub fn table_header() -> String {
    format!(
        "{:<10} {:<24} {:<6} {:<24} {:>7}",
        "ID", "Name", "Level", "Scores", "Overall"
    )
}

/// One fixed-width row per competitor (middle name left out)
pub fn table_row(competitor: &Competitor) -> String {
    format!(
        "{:<10} {:<24} {:<6} {:<24} {:>7.2}",
        competitor.id,
        truncate(
            &format!(
                "{} {}",
                competitor.name.first_name(),
                competitor.name.last_name()
            ),
            24
        ),
        competitor.competition_level,
        format!("{:?}", competitor.scores),
        competitor.overall_score(),
    )
}

pub fn competitor_table(competitors: &[Competitor]) -> Vec<String> {
    competitors.iter().map(table_row).collect()
}

pub fn frequency_table(frequency: &BTreeMap<u32, usize>) -> Vec<String> {
    let mut lines = vec![
        format!("{:<10} {:<10}", "Score", "Frequency"),
        "-".repeat(20),
    ];
    lines.extend(
        frequency
            .iter()
            .map(|(score, count)| format!("{:<10} {:<10}", score, count)),
    );
    lines
}

pub fn summary_lines(summary: &StatisticalSummary) -> Vec<String> {
    if summary.is_empty() {
        return vec!["No competitors available to display statistics.".to_string()];
    }

    let mut lines = vec![format!("Total number of competitors: {}", summary.total)];

    match &summary.top_performer {
        Some(top) => lines.push(format!(
            "Top Performer: {} with an overall score of {:.2}",
            top.name.full_name(),
            top.overall_score()
        )),
        None => lines.push("No top performer found.".to_string()),
    }

    lines.push(String::new());
    lines.push("Score Frequency:".to_string());
    lines.extend(frequency_table(&summary.score_frequency));
    lines
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BeltColor, Gender, Name};

    fn competitor() -> Competitor {
        Competitor::new(
            12,
            Name::new("Maria", "Luisa", "Fernandez"),
            "5",
            Gender::Female,
            BeltColor::Black,
            vec![9, 8, 10, 7, 9],
        )
    }

    #[test]
    fn test_table_row_columns() {
        let row = table_row(&competitor());
        assert!(row.starts_with("12 "));
        assert!(row.contains("Maria Fernandez"));
        assert!(!row.contains("Luisa"));
        assert!(row.contains("[9, 8, 10, 7, 9]"));
        assert!(row.ends_with("8.67"));
    }

    #[test]
    fn test_frequency_table_is_ordered() {
        let frequency: BTreeMap<u32, usize> = [(5, 1), (1, 3)].into_iter().collect();
        let lines = frequency_table(&frequency);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("1 "));
        assert!(lines[3].starts_with("5 "));
    }

    #[test]
    fn test_empty_summary() {
        let summary = StatisticalSummary {
            total: 0,
            top_performer: None,
            score_frequency: BTreeMap::new(),
        };
        assert_eq!(
            summary_lines(&summary),
            vec!["No competitors available to display statistics."]
        );
    }

    #[test]
    fn test_summary_names_top_performer() {
        let top = competitor();
        let summary = StatisticalSummary {
            total: 1,
            top_performer: Some(top.clone()),
            score_frequency: top.scores.iter().fold(BTreeMap::new(), |mut acc, s| {
                *acc.entry(*s).or_insert(0) += 1;
                acc
            }),
        };

        let lines = summary_lines(&summary);
        assert_eq!(lines[0], "Total number of competitors: 1");
        assert_eq!(
            lines[1],
            "Top Performer: Maria Luisa Fernandez with an overall score of 8.67"
        );
    }

    #[test]
    fn test_view_serializes_derived_fields() {
        let competitor = competitor();
        let json = serde_json::to_value(CompetitorView::from(&competitor)).unwrap();

        assert_eq!(json["id"], 12);
        assert_eq!(json["initials"], "MLF");
        assert_eq!(json["belt_color"], "Black");
        assert_eq!(json["name"]["middle_name"], "Luisa");
        assert!((json["overall_score"].as_f64().unwrap() - 26.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long competitor name", 10), "a very ...");
    }
}
