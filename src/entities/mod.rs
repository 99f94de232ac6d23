// Entity Models
//
// Name is a plain value; Competitor owns one and carries the judge scores.

pub mod competitor;
pub mod name;

pub use competitor::{BeltColor, Competitor, Gender, MAX_LEVEL, MIN_LEVEL};
pub use name::Name;
