//! Validation of the custom-game settings form.
//!
//! The form hands over raw text; this module turns it into a
//! [`GameConfig`] or a [`SettingsError`] whose message is shown as the
//! form warning.

use thiserror::Error;

use crate::types::{
    GameConfig, GridSize, MAX_COLS, MAX_DURATION_SECS, MAX_ROWS, MIN_COLS, MIN_DURATION_SECS,
    MIN_ROWS,
};

/// Why the submitted form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// At least one field is not an integer.
    #[error("Please enter valid integer values.")]
    NotAnInteger,

    /// All fields parsed but at least one is outside its range.
    #[error(
        "Please enter valid values for duration ({}-{}), rows ({}-{}), and columns ({}-{}).",
        MIN_DURATION_SECS,
        MAX_DURATION_SECS,
        MIN_ROWS,
        MAX_ROWS,
        MIN_COLS,
        MAX_COLS
    )]
    OutOfRange,
}

/// Placeholder text for each form field.
pub fn duration_hint() -> String {
    format!("Enter duration ({}-{} seconds)", MIN_DURATION_SECS, MAX_DURATION_SECS)
}

pub fn rows_hint() -> String {
    format!("Enter number of rows ({}-{})", MIN_ROWS, MAX_ROWS)
}

pub fn cols_hint() -> String {
    format!("Enter number of columns ({}-{})", MIN_COLS, MAX_COLS)
}

/// Parse and range-check the three form fields.
///
/// Surrounding whitespace is ignored. Type errors take precedence over
/// range errors, so `"abc", "9", "9"` reports `NotAnInteger`.
pub fn parse_settings(duration: &str, rows: &str, cols: &str) -> Result<GameConfig, SettingsError> {
    let duration: i64 = parse_int(duration)?;
    let rows: i64 = parse_int(rows)?;
    let cols: i64 = parse_int(cols)?;

    let duration_ok = (i64::from(MIN_DURATION_SECS)..=i64::from(MAX_DURATION_SECS)).contains(&duration);
    let rows_ok = (MIN_ROWS as i64..=MAX_ROWS as i64).contains(&rows);
    let cols_ok = (MIN_COLS as i64..=MAX_COLS as i64).contains(&cols);

    if !(duration_ok && rows_ok && cols_ok) {
        return Err(SettingsError::OutOfRange);
    }

    Ok(GameConfig {
        duration_secs: duration as u32,
        grid: GridSize::new(rows as usize, cols as usize),
    })
}

/// Check a duration given on the command line for the classic variant.
pub fn validate_duration(secs: u32) -> Result<u32, SettingsError> {
    if (MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(SettingsError::OutOfRange)
    }
}

fn parse_int(text: &str) -> Result<i64, SettingsError> {
    text.trim().parse().map_err(|_| SettingsError::NotAnInteger)
}

// ============================================================================
// TESTS
// ============================================================================
