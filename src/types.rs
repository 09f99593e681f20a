//! Domain types for whack-a-mole.
//!
//! Plain data: grid dimensions, session configuration, score history.
//! Behavior lives in `game`, `settings` and `score_log`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Accepted grid rows in the custom variant.
pub const MIN_ROWS: usize = 3;
pub const MAX_ROWS: usize = 5;

/// Accepted grid columns in the custom variant.
pub const MIN_COLS: usize = 3;
pub const MAX_COLS: usize = 5;

/// Accepted session duration (seconds) in the custom variant.
pub const MIN_DURATION_SECS: u32 = 15;
pub const MAX_DURATION_SECS: u32 = 60;

/// Session length used by the classic variant unless overridden.
pub const CLASSIC_DURATION_SECS: u32 = 30;

/// Period of both the mole timer and the countdown timer.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Score log filename, relative to the working directory.
pub const DEFAULT_SCORE_FILE: &str = "score.txt";

// ============================================================================
// ENUMS
// ============================================================================

/// Which flavour of the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fixed 3x3 grid, one session, exit after the final notice.
    Classic,
    /// Settings form before each session, replay prompt after it.
    Custom,
}

/// The two independent timers driving a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Relocates the mole.
    Mole,
    /// Decrements the time left.
    Countdown,
}

/// Output format for the score history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// STRUCTS
// ============================================================================

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    /// The classic 3x3 board.
    pub const CLASSIC: GridSize = GridSize { rows: 3, cols: 3 };

    pub fn new(rows: usize, cols: usize) -> Self {
        GridSize { rows, cols }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Everything needed to start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Session length in seconds.
    pub duration_secs: u32,
    /// Board dimensions.
    pub grid: GridSize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            duration_secs: CLASSIC_DURATION_SECS,
            grid: GridSize::CLASSIC,
        }
    }
}

/// Runtime options shared by every command.
#[derive(Debug)]
pub struct AppConfig {
    /// Variant to play.
    pub mode: Mode,
    /// Session settings for the classic variant.
    pub classic: GameConfig,
    /// Where completed sessions are appended.
    pub score_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Classic,
            classic: GameConfig::default(),
            score_file: PathBuf::from(DEFAULT_SCORE_FILE),
        }
    }
}

/// Scores read back from the score log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreHistory {
    /// Every recorded score, in file order.
    pub scores: Vec<u32>,
    /// Lines that were not `Score: <integer>` (line number, content).
    pub skipped: Vec<(usize, String)>,
}

impl ScoreHistory {
    pub fn games_played(&self) -> usize {
        self.scores.len()
    }

    pub fn best(&self) -> Option<u32> {
        self.scores.iter().copied().max()
    }

    /// Mean score, None when no games were recorded.
    pub fn average(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let total: u64 = self.scores.iter().map(|&s| u64::from(s)).sum();
        Some(total as f64 / self.scores.len() as f64)
    }
}

// ============================================================================
// TESTS
// ============================================================================
