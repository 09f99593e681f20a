//! Game state and its transitions.
//!
//! Pure: no timers, no terminal, no files. Randomness is injected as a
//! `rand::Rng` so callers pick an entropy-seeded or a fixed-seed rng.
//!
//! A session is driven by two kinds of events:
//! - `Tick(TimerId)` from the mole timer or the countdown timer
//! - `CellSelected(index)` from the player
//!
//! Invariants:
//! - While the session is active exactly one cell holds the mole.
//! - Once finished, no cell holds the mole and every event is ignored.
//! - `time_left` never goes below zero.

use rand::Rng;

use crate::types::{GameConfig, GridSize, TimerId};

// ============================================================================
// GRID
// ============================================================================

/// One selectable square of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// True while this cell holds the mole.
    pub is_mole: bool,
}

impl Cell {
    /// A cell only accepts a hit while it holds the mole.
    pub fn is_enabled(&self) -> bool {
        self.is_mole
    }
}

/// Row-major board of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build an empty board (no mole).
    pub fn new(size: GridSize) -> Self {
        let cells = (0..size.rows)
            .flat_map(|row| (0..size.cols).map(move |col| Cell { row, col, is_mole: false }))
            .collect();
        Grid { size, cells }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Row-major index of (row, col), None when outside the board.
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size.rows && col < self.size.cols).then(|| row * self.size.cols + col)
    }

    /// Index of the mole cell, if any.
    pub fn mole_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_mole)
    }

    pub fn mole_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_mole).count()
    }

    /// Remove the mole from every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.is_mole = false;
        }
    }

    /// Clear the board and put the mole on a uniformly random cell.
    ///
    /// The previous mole cell is a valid pick. Returns the new mole index.
    ///
    /// Panics on an empty grid; sessions never place moles on one.
    pub fn place_mole(&mut self, rng: &mut impl Rng) -> usize {
        self.clear();
        let index = rng.gen_range(0..self.cells.len());
        self.cells[index].is_mole = true;
        index
    }
}

// ============================================================================
// EVENTS & OUTCOMES
// ============================================================================

/// Input to the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A timer fired.
    Tick(TimerId),
    /// The player selected the cell at this row-major index.
    CellSelected(usize),
}

/// What an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mole moved to this cell.
    MoleMoved { index: usize },
    /// The player hit the mole; it reappeared at `next`.
    Hit { score: u32, next: usize },
    /// Selection of a cell without the mole. Nothing changed.
    Miss,
    /// One second elapsed, session still running.
    Countdown { time_left: u32 },
    /// Time ran out on this event. The session is now finished.
    Finished { score: u32 },
    /// The session was already finished. Nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Finished,
}

// ============================================================================
// SESSION
// ============================================================================

/// One timed play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    grid: Grid,
    score: u32,
    time_left: u32,
    duration_secs: u32,
    placements: u32,
    status: SessionStatus,
}

impl GameSession {
    /// Start a session with the first mole already placed.
    ///
    /// A zero duration yields a session that is finished from the start.
    pub fn start(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut session = GameSession {
            grid: Grid::new(config.grid),
            score: 0,
            time_left: config.duration_secs,
            duration_secs: config.duration_secs,
            placements: 0,
            status: SessionStatus::Active,
        };
        if config.duration_secs == 0 || config.grid.cell_count() == 0 {
            session.status = SessionStatus::Finished;
        } else {
            session.relocate(rng);
        }
        session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Number of times a mole has been placed, including the first.
    pub fn placements(&self) -> u32 {
        self.placements
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    /// Apply one event. This is the only way the session changes.
    pub fn apply(&mut self, event: GameEvent, rng: &mut impl Rng) -> Outcome {
        if self.is_finished() {
            return Outcome::Ignored;
        }
        match event {
            GameEvent::Tick(TimerId::Mole) => Outcome::MoleMoved {
                index: self.relocate(rng),
            },
            GameEvent::Tick(TimerId::Countdown) => self.count_down(),
            GameEvent::CellSelected(index) => self.select(index, rng),
        }
    }

    fn relocate(&mut self, rng: &mut impl Rng) -> usize {
        self.placements += 1;
        self.grid.place_mole(rng)
    }

    fn select(&mut self, index: usize, rng: &mut impl Rng) -> Outcome {
        match self.grid.cell(index) {
            Some(cell) if cell.is_enabled() => {
                self.score += 1;
                self.grid.cells[index].is_mole = false;
                let next = self.relocate(rng);
                Outcome::Hit {
                    score: self.score,
                    next,
                }
            }
            _ => Outcome::Miss,
        }
    }

    fn count_down(&mut self) -> Outcome {
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.status = SessionStatus::Finished;
            self.grid.clear();
            Outcome::Finished { score: self.score }
        } else {
            Outcome::Countdown {
                time_left: self.time_left,
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
