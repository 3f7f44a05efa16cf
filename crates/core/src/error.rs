//! Error types shared by the engine, the console and the validators.

use std::io;

/// Errors raised by the console, the menu engine and session guards.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The user asked to quit. Unwinds every open menu level.
    #[error("session terminated")]
    Terminated,
    /// The input stream reached end-of-file while a prompt was waiting.
    #[error("input stream closed")]
    InputClosed,
    /// A guarded action ran without an authenticated user.
    #[error("you have to be logged in for that")]
    NotLoggedIn,
    /// Reading from or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TrackerError {
    /// Whether this error is the quit signal rather than a failure.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// Returns `true` when an `anyhow` error chain carries the quit signal.
pub fn is_terminated(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<TrackerError>())
        .any(TrackerError::is_terminated)
}

/// Rejections produced by the field validators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Username does not match the allowed pattern.
    #[error("\"{0}\" is not a valid username")]
    InvalidUsername(String),
    /// Username is reserved or already registered.
    #[error("username \"{0}\" already exists")]
    UsernameTaken(String),
    /// Password breaks the listed rules.
    #[error("invalid password: {}", .0.join(", "))]
    WeakPassword(Vec<&'static str>),
    /// Email is not shaped like `local@domain.tld`.
    #[error("invalid email format")]
    InvalidEmail,
    /// Email belongs to another user.
    #[error("email \"{0}\" already in use")]
    EmailTaken(String),
    /// Phone number is not in E.164 form.
    #[error("invalid phone number format")]
    InvalidPhone,
    /// Date matches neither accepted input format.
    #[error("invalid date format")]
    InvalidDate,
    /// Free-text field is shorter than `min` characters.
    #[error("{field} should be at least {min} characters")]
    TooShort {
        /// Field name shown to the user.
        field: &'static str,
        /// Required character count.
        min: usize,
    },
    /// Input is not an accepted number.
    #[error("not a valid number")]
    InvalidNumber,
}

impl ValidationError {
    /// User-facing lines printed inside a frame when the rejection is shown.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::InvalidUsername(name) => vec![
                format!("\"{name}\" is not a valid username!"),
                "Username must be 3-14 characters long and contain only lowercase letters, digits, hyphens (-), or underscores (_).".to_string(),
                "Please try again.".to_string(),
            ],
            Self::UsernameTaken(name) => {
                vec![format!("Username \"{name}\" already exists! Please try again.")]
            }
            Self::WeakPassword(reasons) => {
                let mut lines = vec![
                    "That is an invalid password.".to_string(),
                    "Password must:".to_string(),
                ];
                lines.extend(reasons.iter().map(|reason| format!("- {reason}")));
                lines
            }
            Self::InvalidEmail => vec!["Invalid email format. Please try again.".to_string()],
            Self::EmailTaken(email) => vec![format!(
                "A user with the e-mail address \"{email}\" already exists! Please try again."
            )],
            Self::InvalidPhone => {
                vec!["Invalid phone number format. Please try again.".to_string()]
            }
            Self::InvalidDate => vec![
                "Invalid date format. Provide in either \"MM/DD/YYYY\" or \"MM-DD-YYYY\"."
                    .to_string(),
                "Please try again.".to_string(),
            ],
            Self::TooShort { field, min } => vec![format!(
                "{field} should be at least {min} characters. Please try again."
            )],
            Self::InvalidNumber => vec![
                "Not a valid number!".to_string(),
                "Please try again.".to_string(),
            ],
        }
    }
}
