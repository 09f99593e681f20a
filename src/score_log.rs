//! Score log: one `Score: <n>` line appended per completed session.
//!
//! Structure:
//! - Pure functions: line formatting and parsing
//! - Effect functions: append, read back

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::ScoreHistory;

/// Prefix of every score line.
const LINE_PREFIX: &str = "Score: ";

/// Failure to touch the score log.
#[derive(Debug, Error)]
pub enum ScoreLogError {
    #[error("could not append to score log {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read score log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Format a score as a log line, newline included.
pub fn format_line(score: u32) -> String {
    format!("{}{}\n", LINE_PREFIX, score)
}

/// Parse one log line. Trailing whitespace (including `\r`) is ignored.
pub fn parse_line(line: &str) -> Option<u32> {
    line.trim_end().strip_prefix(LINE_PREFIX)?.parse().ok()
}

/// Collect scores from log contents, remembering lines that did not parse.
///
/// Blank lines are neither scores nor skipped.
pub fn parse_history(contents: &str) -> ScoreHistory {
    let mut history = ScoreHistory::default();
    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(score) => history.scores.push(score),
            None => history.skipped.push((i + 1, line.to_string())),
        }
    }
    history
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Append a completed session's score, creating the file if needed.
pub fn append_score(path: &Path, score: u32) -> Result<(), ScoreLogError> {
    let append_err = |source| ScoreLogError::Append {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(append_err)?;
    file.write_all(format_line(score).as_bytes()).map_err(append_err)?;

    tracing::info!(score, path = %path.display(), "score recorded");
    Ok(())
}

/// Read the whole log. A missing file is an empty history.
pub fn read_history(path: &Path) -> Result<ScoreHistory, ScoreLogError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(parse_history(&contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ScoreHistory::default()),
        Err(source) => Err(ScoreLogError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
