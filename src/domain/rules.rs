//! Pattern rules for structurally regular identifiers.
//!
//! A rule binds one compiled regular expression to one category and a fixed
//! replacement token. Rule lists are ordered: earlier rules rewrite the text
//! that later rules see.

use once_cell::sync::Lazy;
use regex::Regex;

use super::RedactionCategory;
use crate::error::{RedactorError, RedactorResult};

/// Any run of 10-16 digits. No Luhn or prefix check.
pub const ACCOUNT_PATTERN: &str = r"\b\d{10,16}\b";

/// US social security number, `XXX-XX-XXXX`.
pub const SSN_PATTERN: &str = r"\b\d{3}-\d{2}-\d{4}\b";

/// SWIFT/BIC: 6 letters, 2 alphanumerics, optional 3-character branch.
pub const SWIFT_PATTERN: &str = r"\b[A-Z]{6}[A-Z0-9]{2}([A-Z0-9]{3})?\b";

/// IBAN: country code, check digits, up to 30 alphanumerics.
pub const IBAN_PATTERN: &str = r"\b[A-Z]{2}\d{2}[A-Z0-9]{1,30}\b";

pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+";

/// One immutable pattern rule.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pattern: Regex,
    category: RedactionCategory,
    replacement_token: String,
}

impl RedactionRule {
    /// Compiles `pattern` into a rule using the category's standard token.
    pub fn new(category: RedactionCategory, pattern: &str) -> RedactorResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| RedactorError::InvalidRule {
            category,
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if pattern.is_match("") {
            return Err(RedactorError::InvalidRule {
                category,
                pattern: pattern.as_str().to_string(),
                reason: "pattern matches the empty string".to_string(),
            });
        }

        Ok(Self {
            pattern,
            category,
            replacement_token: category.token(),
        })
    }

    /// Overrides the replacement token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.replacement_token = token.into();
        self
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn category(&self) -> RedactionCategory {
        self.category
    }

    pub fn replacement_token(&self) -> &str {
        &self.replacement_token
    }
}

static DEFAULT_RULES: Lazy<Vec<RedactionRule>> = Lazy::new(|| {
    [
        (RedactionCategory::Account, ACCOUNT_PATTERN),
        (RedactionCategory::Ssn, SSN_PATTERN),
        (RedactionCategory::Swift, SWIFT_PATTERN),
        (RedactionCategory::Iban, IBAN_PATTERN),
        (RedactionCategory::Email, EMAIL_PATTERN),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        RedactionRule::new(category, pattern).expect("Valid built-in redaction pattern")
    })
    .collect()
});

/// The built-in rules in their fixed order: Account, SSN, SWIFT, IBAN, Email.
pub fn default_rules() -> Vec<RedactionRule> {
    DEFAULT_RULES.clone()
}
