//! Input and parsing helper functions for the CLI.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use dialoguer::Password;

use crate::errors::CliError;

/// Prompt for a paste password on the terminal.
///
/// `confirm` asks twice, for creating protected pastes.
pub fn prompt_password(confirm: bool) -> anyhow::Result<String> {
    if !io::stdin().is_terminal() {
        return Err(CliError::auth_failed_with_hint(
            "No password provided and no TTY available.",
            "Hint: Pass --password or set KLISTRA_PASSWORD.",
        )
        .into());
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Read paste text from stdin; refuses to wait on an interactive terminal.
pub fn read_stdin_text() -> anyhow::Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::invalid_input(
            "No paste text given. Pass --text or pipe text on stdin.",
        )
        .into());
    }
    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    Ok(buffer)
}

/// Parse a duration given as plain seconds or `<number><unit>` (s, m, h, d, w).
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return positive(seconds, value);
    }

    // Split on a char boundary so a multibyte unit is rejected, not sliced.
    let (num_str, unit) = match value.char_indices().last() {
        Some((idx, _)) if idx > 0 => value.split_at(idx),
        _ => {
            return Err(CliError::invalid_input(format!(
                "Invalid duration: {} (expected seconds or <number><unit>)",
                value
            ))
            .into())
        }
    };
    let amount: u64 = num_str
        .parse()
        .map_err(|_| CliError::invalid_input(format!("Invalid duration number: {}", value)))?;

    let scale = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86_400,
        "w" => 604_800,
        _ => {
            return Err(CliError::invalid_input(format!(
                "Invalid duration unit: {} (use s, m, h, d, or w)",
                value
            ))
            .into())
        }
    };

    let seconds = amount
        .checked_mul(scale)
        .ok_or_else(|| CliError::invalid_input(format!("Duration too large: {}", value)))?;
    positive(seconds, value)
}

fn positive(seconds: u64, original: &str) -> anyhow::Result<Duration> {
    if seconds == 0 {
        return Err(
            CliError::invalid_input(format!("Duration must be positive: {}", original)).into(),
        );
    }
    Ok(Duration::from_secs(seconds))
}
