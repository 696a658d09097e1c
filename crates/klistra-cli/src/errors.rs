//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors that reach `main`
//! are classified by variant.

use std::fmt;

use klistra_core::KlistraError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Paste or config not found
    NotFound { message: String, hint: String },

    /// Missing or wrong password
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error that reaches `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    match err.downcast_ref::<KlistraError>() {
        Some(KlistraError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(KlistraError::Authentication(_)) => exit_codes::AUTH_FAILED,
        Some(KlistraError::InvalidInput(_)) => exit_codes::INVALID_INPUT,
        _ => exit_codes::GENERAL,
    }
}

/// Follow-up advice for common core failures.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<KlistraError>()? {
        KlistraError::NotFound(_) => {
            Some("Hint: Pastes self-destruct after their expiry; ask the sender for a new one.")
        }
        KlistraError::Authentication(_) => Some("Hint: Pass --password or set KLISTRA_PASSWORD."),
        _ => None,
    }
}
