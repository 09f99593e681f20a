//! Report formatting for the score history.
//!
//! Pure functions from (ScoreHistory, OutputFormat) to String.
//! No I/O, no side effects.

use serde::Serialize;

use crate::types::{OutputFormat, ScoreHistory};

/// Format a score history for output.
pub fn format_history(history: &ScoreHistory, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(history),
        OutputFormat::Json => format_json(history),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(history: &ScoreHistory) -> String {
    if history.scores.is_empty() && history.skipped.is_empty() {
        return "No games recorded yet.\n".to_string();
    }

    let mut out = String::new();

    if !history.scores.is_empty() {
        out.push_str("=== Scores ===\n");
        for (i, score) in history.scores.iter().enumerate() {
            out.push_str(&format!("  #{:<4} {}\n", i + 1, score));
        }
        out.push('\n');
    }

    if !history.skipped.is_empty() {
        out.push_str("=== Skipped (unreadable lines) ===\n");
        for (line_no, line) in &history.skipped {
            out.push_str(&format!("  line {}: {}\n", line_no, line));
        }
        out.push('\n');
    }

    out.push_str(&format_summary(history));
    out
}

fn format_summary(history: &ScoreHistory) -> String {
    let mut out = String::new();
    out.push_str("=== Summary ===\n");
    out.push_str(&format!("Games played:  {}\n", history.games_played()));
    if let Some(best) = history.best() {
        out.push_str(&format!("Best score:    {}\n", best));
    }
    if let Some(avg) = history.average() {
        out.push_str(&format!("Average score: {:.1}\n", avg));
    }
    if !history.skipped.is_empty() {
        out.push_str(&format!("Skipped lines: {}\n", history.skipped.len()));
    }
    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

/// JSON shape: raw data plus the derived statistics.
#[derive(Serialize)]
struct HistoryJson<'a> {
    games_played: usize,
    best: Option<u32>,
    average: Option<f64>,
    #[serde(flatten)]
    history: &'a ScoreHistory,
}

fn format_json(history: &ScoreHistory) -> String {
    let json = HistoryJson {
        games_played: history.games_played(),
        best: history.best(),
        average: history.average(),
        history,
    };
    // Plain structs of numbers and strings always serialize.
    serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
        panic!("Failed to serialize score history to JSON: {}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================
