//! Redaction categories and their replacement tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of things the engine redacts.
///
/// The first five are produced by pattern rules, the last five by the
/// entity recognizer. Each category has exactly one replacement token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RedactionCategory {
    Account,
    Ssn,
    Swift,
    Iban,
    Email,
    Person,
    Place,
    Organization,
    Location,
    Money,
}

impl RedactionCategory {
    /// All categories in declaration order.
    pub const ALL: [RedactionCategory; 10] = [
        Self::Account,
        Self::Ssn,
        Self::Swift,
        Self::Iban,
        Self::Email,
        Self::Person,
        Self::Place,
        Self::Organization,
        Self::Location,
        Self::Money,
    ];

    /// Categories the entity pass may emit.
    pub const ENTITY: [RedactionCategory; 5] = [
        Self::Person,
        Self::Place,
        Self::Organization,
        Self::Location,
        Self::Money,
    ];

    /// Canonical name, as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Ssn => "SSN",
            Self::Swift => "SWIFT",
            Self::Iban => "IBAN",
            Self::Email => "Email",
            Self::Person => "Person",
            Self::Place => "Place",
            Self::Organization => "Organization",
            Self::Location => "Location",
            Self::Money => "Money",
        }
    }

    /// Label embedded in the replacement token.
    ///
    /// Pattern categories are upper-cased, entity categories keep their name.
    fn token_label(&self) -> &'static str {
        match self {
            Self::Account => "ACCOUNT",
            Self::Ssn => "SSN",
            Self::Swift => "SWIFT",
            Self::Iban => "IBAN",
            Self::Email => "EMAIL",
            other => other.name(),
        }
    }

    /// Replacement token, e.g. `[REDACTED_SSN]` or `[REDACTED_Person]`.
    pub fn token(&self) -> String {
        format!("[REDACTED_{}]", self.token_label())
    }

    /// Returns true for categories produced by the entity recognizer.
    pub fn is_entity(&self) -> bool {
        Self::ENTITY.contains(self)
    }
}

impl fmt::Display for RedactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown redaction category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for RedactionCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for RedactionCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RedactionCategory> for String {
    fn from(category: RedactionCategory) -> Self {
        category.name().to_string()
    }
}
