// 🥋 Competitor Entity - identity, classification and judge scores
//
// The id is assigned by the caller (see `next_available_id` on the repository)
// and never changes once the row is persisted.

use crate::entities::name::Name;
use crate::scoring::{compute_overall_score, SCORE_COUNT};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// GENDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Case-insensitive: "male", "MALE" and "Male" are the same value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown gender '{}' (expected Male or Female)", s))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BELT COLOR
// ============================================================================

/// Belt colors, lowest rank first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[value(rename_all = "PascalCase")]
pub enum BeltColor {
    White,
    Yellow,
    Blue,
    Purple,
    Brown,
    Black,
}

impl BeltColor {
    pub const ALL: [BeltColor; 6] = [
        BeltColor::White,
        BeltColor::Yellow,
        BeltColor::Blue,
        BeltColor::Purple,
        BeltColor::Brown,
        BeltColor::Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeltColor::White => "White",
            BeltColor::Yellow => "Yellow",
            BeltColor::Blue => "Blue",
            BeltColor::Purple => "Purple",
            BeltColor::Brown => "Brown",
            BeltColor::Black => "Black",
        }
    }
}

impl FromStr for BeltColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeltColor::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown belt color '{}' (expected one of White, Yellow, Blue, Purple, Brown, Black)",
                    s
                )
            })
    }
}

impl fmt::Display for BeltColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// COMPETITOR ENTITY
// ============================================================================

/// Lowest and highest competition level category
pub const MIN_LEVEL: u8 = 0;
pub const MAX_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    /// Externally allocated, unique, positive
    pub id: i64,

    pub name: Name,

    /// Integer category 0-5 kept as text, the way it is stored
    pub competition_level: String,

    pub gender: Gender,

    pub belt_color: BeltColor,

    /// Judge scores in entry order (score1..score5)
    pub scores: Vec<u32>,
}

impl Competitor {
    pub fn new(
        id: i64,
        name: Name,
        competition_level: impl Into<String>,
        gender: Gender,
        belt_color: BeltColor,
        scores: Vec<u32>,
    ) -> Self {
        Competitor {
            id,
            name,
            competition_level: competition_level.into(),
            gender,
            belt_color,
            scores,
        }
    }

    /// Trimmed mean of the current scores
    pub fn overall_score(&self) -> f64 {
        compute_overall_score(&self.scores)
    }

    /// Score at a 0-based position; 0 when the position is out of range
    pub fn score(&self, index: usize) -> u32 {
        self.scores.get(index).copied().unwrap_or(0)
    }

    /// All five positional scores, padded with 0 for short sequences
    pub fn score_slots(&self) -> [u32; SCORE_COUNT] {
        let mut slots = [0; SCORE_COUNT];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = self.score(i);
        }
        slots
    }

    /// Replace one positional score. Returns false when `index` is out of range.
    pub fn set_score(&mut self, index: usize, score: u32) -> bool {
        match self.scores.get_mut(index) {
            Some(slot) => {
                *slot = score;
                true
            }
            None => false,
        }
    }

    /// Parsed level category, None when the stored text is not an integer 0-5
    pub fn level(&self) -> Option<u8> {
        self.competition_level
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|level| (MIN_LEVEL..=MAX_LEVEL).contains(level))
    }

    /// Long multi-sentence description
    pub fn full_details(&self) -> String {
        let full_name = self.name.full_name();
        format!(
            "Competitor ID {}, name {} gender: {}.\n\
             {} is a {} level with belt color {}.\n\
             Received these scores: {:?} and has an overall score of {:.2}.\n",
            self.id,
            full_name,
            self.gender,
            full_name,
            self.competition_level,
            self.belt_color,
            self.scores,
            self.overall_score(),
        )
    }

    /// One-line summary keyed by competitor number and initials
    pub fn short_details(&self) -> String {
        format!(
            "CN {} ({}) has overall score {:.2}",
            self.id,
            self.name.initials(),
            self.overall_score()
        )
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Competitor ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name.full_name())?;
        writeln!(f, "Competition Level: {}", self.competition_level)?;
        writeln!(f, "Gender: {}", self.gender)?;
        writeln!(f, "Belt Color: {}", self.belt_color)?;
        writeln!(f, "Scores: {:?}", self.scores)?;
        write!(f, "Overall Score: {:.2}", self.overall_score())
    }
}

// ============================================================================
// TESTS
// ============================================================================
