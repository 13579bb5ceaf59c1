// src/core/validation.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    static ref INTEGER_RE: Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref ALPHANUMERIC_RE: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*$").unwrap();
    static ref EMAIL_RE: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z][A-Z0-9.-]+\.[A-Z]{2,26}$").unwrap();
}

/// A named predicate that constrains the raw token bound to an argument.
///
/// Rules run while a command line is matched; a command's precondition, in
/// contrast, gates the command as a whole before matching starts. The label
/// appears in the parse error shown to the user ("Must be a valid number."),
/// so it should read as a noun phrase.
///
/// ```
/// use herald::ValidationRule;
///
/// let even = ValidationRule::new("even number", |v| {
///     v.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false)
/// });
/// assert!(even.validate("42"));
/// assert!(!even.validate("7"));
/// ```
#[derive(Clone)]
pub struct ValidationRule {
    label: String,
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl ValidationRule {
    /// Creates a custom rule from a label and a predicate.
    pub fn new(label: impl Into<String>, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// The default rule: accepts every value. Its label is empty.
    pub fn always_true() -> Self {
        Self::new("", |_| true)
    }

    /// Accepts whole numbers, with an optional leading minus sign.
    pub fn integer() -> Self {
        Self::new("number", |value| INTEGER_RE.is_match(value))
    }

    /// Accepts plausible e-mail addresses.
    pub fn email() -> Self {
        Self::new("email", |value| EMAIL_RE.is_match(value))
    }

    /// Accepts values starting with a letter and continuing alphanumerically.
    pub fn alphanumeric() -> Self {
        Self::new("alphanumeric string", |value| {
            ALPHANUMERIC_RE.is_match(value)
        })
    }

    /// Runs the predicate against a raw token.
    pub fn validate(&self, value: &str) -> bool {
        (self.predicate)(value)
    }

    /// The label rendered inside validation error messages.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self::always_true()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rule() {
        let rule = ValidationRule::integer();
        assert!(rule.validate("42"));
        assert!(rule.validate("-17"));
        assert!(!rule.validate("1.5"));
        assert!(!rule.validate("abc"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_alphanumeric_rule() {
        let rule = ValidationRule::alphanumeric();
        assert!(rule.validate("user1"));
        assert!(!rule.validate("1user"));
        assert!(!rule.validate("user name"));
    }

    #[test]
    fn test_email_rule() {
        let rule = ValidationRule::email();
        assert!(rule.validate("admin@example.com"));
        assert!(rule.validate("first.last+tag@sub.example.org"));
        assert!(!rule.validate("not-an-email"));
        assert!(!rule.validate("missing@tld"));
    }

    #[test]
    fn test_custom_rule_and_label() {
        let rule = ValidationRule::new("short word", |v| v.len() <= 4);
        assert!(rule.validate("abc"));
        assert!(!rule.validate("toolong"));
        assert_eq!(rule.label(), "short word");
    }

    #[test]
    fn test_always_true_accepts_everything() {
        let rule = ValidationRule::always_true();
        assert!(rule.validate(""));
        assert!(rule.validate("anything at all"));
    }
}
