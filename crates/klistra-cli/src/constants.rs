//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    pub const GENERAL: i32 = 1;

    /// Paste absent or expired, or config missing.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Missing or wrong paste password.
    pub const AUTH_FAILED: i32 = 5;
}

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "KLISTRA_CONFIG";

/// Default paste lifetime when neither flag nor config sets one (one hour).
pub const DEFAULT_EXPIRY_SECONDS: u64 = 3600;
