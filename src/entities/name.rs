// 🪪 Name - value type for a competitor's name
//
// Initials and full name are derived on every read, so they can never go
// stale after a component changes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    first_name: String,
    /// Empty when the competitor has no middle name
    #[serde(default)]
    middle_name: String,
    last_name: String,
}

impl Name {
    pub fn new(
        first_name: impl Into<String>,
        middle_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Name {
            first_name: first_name.into(),
            middle_name: middle_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_middle_name(&mut self, middle_name: impl Into<String>) {
        self.middle_name = middle_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn has_middle_name(&self) -> bool {
        !self.middle_name.is_empty()
    }

    /// Both required components are present
    pub fn is_complete(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty()
    }

    /// Uppercase first letter of each present component.
    ///
    /// Empty when either required component is missing.
    pub fn initials(&self) -> String {
        if !self.is_complete() {
            return String::new();
        }

        self.components()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Components joined by single spaces, middle name omitted when empty
    pub fn full_name(&self) -> String {
        self.components().collect::<Vec<_>>().join(" ")
    }

    fn components(&self) -> impl Iterator<Item = &str> {
        [
            self.first_name.as_str(),
            self.middle_name.as_str(),
            self.last_name.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_without_middle_name() {
        let name = Name::new("John", "", "Smith");
        assert_eq!(name.initials(), "JS");
        assert_eq!(name.full_name(), "John Smith");
    }

    #[test]
    fn test_initials_with_middle_name() {
        let name = Name::new("John", "Quincy", "Smith");
        assert_eq!(name.initials(), "JQS");
        assert_eq!(name.full_name(), "John Quincy Smith");
    }

    #[test]
    fn test_initials_are_uppercased() {
        let name = Name::new("ada", "", "lovelace");
        assert_eq!(name.initials(), "AL");
    }

    #[test]
    fn test_missing_required_component_gives_empty_initials() {
        assert_eq!(Name::new("", "Quincy", "Smith").initials(), "");
        assert_eq!(Name::new("John", "Quincy", "").initials(), "");
    }

    #[test]
    fn test_setters_refresh_derived_values() {
        let mut name = Name::new("John", "", "Smith");
        assert_eq!(name.initials(), "JS");

        name.set_middle_name("Quincy");
        assert_eq!(name.initials(), "JQS");
        assert_eq!(name.full_name(), "John Quincy Smith");

        name.set_first_name("Jane");
        name.set_last_name("Doe");
        assert_eq!(name.initials(), "JQD");

        name.set_middle_name("");
        assert_eq!(name.initials(), "JD");
        assert_eq!(name.to_string(), "Jane Doe");
    }

    #[test]
    fn test_non_ascii_initials() {
        let name = Name::new("élodie", "", "ßmith");
        // 'ß' uppercases to "SS"
        assert_eq!(name.initials(), "ÉSS");
    }
}
