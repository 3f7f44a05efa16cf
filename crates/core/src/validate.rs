//! Field validators for registration and purchase entry.

use std::{collections::HashSet, fs, path::Path};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::{error::ValidationError, store::UserStore};

/// Names nobody may register.
pub const RESERVED_USERNAMES: [&str; 3] = ["admin", "root", "guest"];
/// Accepted input formats for dates.
pub const DATE_INPUT_FORMATS: [&str; 2] = ["%m/%d/%Y", "%m-%d-%Y"];
/// Format dates are stored and compared in.
pub const DATE_STORAGE_FORMAT: &str = "%Y/%m/%d";
/// Minimum length of free-text purchase fields.
pub const MIN_TEXT_LEN: usize = 3;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]{3,14}$").expect("invalid username regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@ \t\r\n]+@[^@ \t\r\n]+\.[^@ \t\r\n]+$").expect("invalid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{8,15}$").expect("invalid phone regex"));
static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("invalid upper regex"));
static LOWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("invalid lower regex"));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("invalid digit regex"));
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!@#$%^&*]").expect("invalid special regex"));

/// Check that `username` is well formed, not reserved and not in use.
pub fn validate_new_username(username: &str, store: &UserStore) -> Result<(), ValidationError> {
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername(username.to_string()));
    }
    if RESERVED_USERNAMES.contains(&username) || store.username_taken(username) {
        return Err(ValidationError::UsernameTaken(username.to_string()));
    }
    Ok(())
}

/// Password rules plus the list of passwords considered too common.
#[derive(Debug, Clone, Default)]
pub struct PasswordPolicy {
    common: HashSet<String>,
}

impl PasswordPolicy {
    /// Policy with an explicit common-password list.
    pub fn new<I, S>(common: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            common: common.into_iter().map(Into::into).collect(),
        }
    }

    /// Read one password per line from `path`.
    ///
    /// An absent or unreadable list disables the common-password rule.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match fs::read_to_string(path) {
            Ok(content) => {
                let policy = Self::new(
                    content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty()),
                );
                info!(
                    "loaded {} common passwords from {}",
                    policy.common.len(),
                    path.display()
                );
                policy
            }
            Err(err) => {
                warn!("failed to read common passwords {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Report every unmet rule at once.
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        let mut reasons = Vec::new();
        if self.common.contains(password) {
            reasons.push("not be too common");
        }
        if password.contains(' ') {
            reasons.push("not contain empty spaces");
        }
        if !(8..=20).contains(&password.chars().count()) {
            reasons.push("be between 8 and 20 characters long");
        }
        if !UPPER_RE.is_match(password) {
            reasons.push("contain at least one uppercase letter");
        }
        if !LOWER_RE.is_match(password) {
            reasons.push("contain at least one lowercase letter");
        }
        if !DIGIT_RE.is_match(password) {
            reasons.push("contain at least one digit");
        }
        if !SPECIAL_RE.is_match(password) {
            reasons.push("contain at least one special character");
        }
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::WeakPassword(reasons))
        }
    }
}

/// Check the basic `local@domain.tld` shape and uniqueness.
pub fn validate_email(email: &str, store: &UserStore) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if store.email_taken(email) {
        return Err(ValidationError::EmailTaken(email.to_string()));
    }
    Ok(())
}

/// Check for an E.164 number: `+` then 8 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

/// Parse `MM/DD/YYYY` or `MM-DD-YYYY` and return it as `YYYY/MM/DD`.
pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .map(|date| date.format(DATE_STORAGE_FORMAT).to_string())
        .ok_or(ValidationError::InvalidDate)
}

/// Lowercase `input` and require at least [`MIN_TEXT_LEN`] characters.
pub fn normalize_text(input: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = input.trim().to_lowercase();
    if value.chars().count() < MIN_TEXT_LEN {
        return Err(ValidationError::TooShort {
            field,
            min: MIN_TEXT_LEN,
        });
    }
    Ok(value)
}

/// Parse a finite, non-negative decimal amount.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or(ValidationError::InvalidNumber)
}

/// Parse a positive whole quantity.
pub fn parse_quantity(input: &str) -> Result<u32, ValidationError> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or(ValidationError::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use anyhow::Result;
    use tempfile::tempdir;

    fn store_with(username: &str, email: &str) -> Result<(tempfile::TempDir, UserStore)> {
        let dir = tempdir()?;
        let mut store = UserStore::open(dir.path().join("users.json"))?;
        store.add(User {
            username: username.to_string(),
            password: "Secret#123".to_string(),
            email: email.to_string(),
            phone: "+491234567890".to_string(),
            purchases: Vec::new(),
            spending_limit: 0.0,
        })?;
        Ok((dir, store))
    }

    #[test]
    fn usernames() -> Result<()> {
        let (_dir, store) = store_with("alice", "alice@example.com")?;
        assert!(validate_new_username("bob_99", &store).is_ok());
        assert_eq!(
            validate_new_username("Bob", &store),
            Err(ValidationError::InvalidUsername("Bob".into()))
        );
        assert!(validate_new_username("ab", &store).is_err());
        assert!(validate_new_username("a".repeat(15).as_str(), &store).is_err());
        assert_eq!(
            validate_new_username("root", &store),
            Err(ValidationError::UsernameTaken("root".into()))
        );
        assert_eq!(
            validate_new_username("alice", &store),
            Err(ValidationError::UsernameTaken("alice".into()))
        );
        Ok(())
    }

    #[test]
    fn passwords_collect_all_reasons() {
        let policy = PasswordPolicy::new(["Password1!"]);
        assert!(policy.validate("Str0ng#Pass").is_ok());

        let Err(ValidationError::WeakPassword(reasons)) = policy.validate("abc def") else {
            panic!("expected weak password");
        };
        assert_eq!(
            reasons,
            vec![
                "not contain empty spaces",
                "be between 8 and 20 characters long",
                "contain at least one uppercase letter",
                "contain at least one digit",
                "contain at least one special character",
            ]
        );

        assert_eq!(
            policy.validate("Password1!"),
            Err(ValidationError::WeakPassword(vec!["not be too common"]))
        );
    }

    #[test]
    fn common_password_list_loads_from_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("common.txt");
        fs::write(&path, "Password1!\n\n  Qwerty#123  \n")?;
        let policy = PasswordPolicy::load(Some(path.as_path()));
        assert_eq!(policy.common.len(), 2);
        assert!(policy.validate("Qwerty#123").is_err());

        let missing = PasswordPolicy::load(Some(dir.path().join("absent.txt").as_path()));
        assert_eq!(missing.common.len(), 0);
        Ok(())
    }

    #[test]
    fn emails() -> Result<()> {
        let (_dir, store) = store_with("alice", "alice@example.com")?;
        assert!(validate_email("bob@example.org", &store).is_ok());
        assert_eq!(validate_email("bob@example", &store), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("b ob@x.io", &store), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b@c.io", &store), Err(ValidationError::InvalidEmail));
        assert_eq!(
            validate_email("alice@example.com", &store),
            Err(ValidationError::EmailTaken("alice@example.com".into()))
        );
        Ok(())
    }

    #[test]
    fn phones() {
        assert!(validate_phone("+491234567890").is_ok());
        assert!(validate_phone("+12345678").is_ok());
        assert!(validate_phone("491234567890").is_err());
        assert!(validate_phone("+49 123 4567").is_err());
        assert!(validate_phone("+1234567").is_err());
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(normalize_date("03/15/2024").as_deref(), Ok("2024/03/15"));
        assert_eq!(normalize_date(" 12-01-2023 ").as_deref(), Ok("2023/12/01"));
        assert_eq!(normalize_date("2024-03-15"), Err(ValidationError::InvalidDate));
        assert_eq!(normalize_date("02/30/2024"), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn text_and_numbers() {
        assert_eq!(normalize_text("  Amazon ", "Seller name").as_deref(), Ok("amazon"));
        assert!(normalize_text("ab", "Seller name").is_err());
        assert_eq!(parse_amount("2.4"), Ok(2.4));
        assert_eq!(parse_amount("0"), Ok(0.0));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("abc").is_err());
        assert_eq!(parse_quantity("3"), Ok(3));
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("1.5").is_err());
    }
}
