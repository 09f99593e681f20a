//! TUI state algebra: pure types, zero effects.
//!
//! These types define the entire TUI state space. The transition function
//! (`update`) and rendering layer (`view`) both program against them.
//!
//! Screen variants carry everything their screen needs, including the live
//! game session while playing. Cross-screen data (mode, timer generation)
//! lives in App.

use crossterm::event::{KeyEvent, MouseEvent};

use crate::game::GameSession;
use crate::types::{GameConfig, Mode, TimerId};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Three producers feed a single mpsc channel:
/// - A terminal reader thread sends `Key`, `Mouse` and `Resize`
/// - The mole timer and the countdown timer send `Tick`
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event.
    Key(KeyEvent),
    /// A terminal mouse event.
    Mouse(MouseEvent),
    /// Terminal size changed; only triggers a redraw.
    Resize,
    /// A timer fired for the session with this generation.
    Tick { timer: TimerId, generation: u64 },
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    /// Current screen.
    pub screen: Screen,

    /// Classic or custom flow.
    pub mode: Mode,

    /// Incremented on every session start. Ticks tagged with an older
    /// generation belong to a stopped session and are dropped.
    pub generation: u64,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current TUI screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Custom-game settings form.
    Settings(SettingsForm),

    /// A session in progress.
    Playing {
        session: GameSession,
        /// Keyboard cursor, row-major cell index.
        cursor: usize,
    },

    /// Time is up. The finished session stays visible under the notice.
    GameOver {
        session: GameSession,
        /// Whether the score reached the score log.
        saved: bool,
    },

    /// "Play again?" prompt (custom mode only).
    PlayAgain,
}

/// Default screen is an empty settings form (placeholder during transitions).
impl Default for Screen {
    fn default() -> Self {
        Screen::Settings(SettingsForm::default())
    }
}

/// The three fields of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Duration,
    Rows,
    Cols,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Duration, Field::Rows, Field::Cols];

    pub fn next(self) -> Field {
        match self {
            Field::Duration => Field::Rows,
            Field::Rows => Field::Cols,
            Field::Cols => Field::Duration,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Duration => Field::Cols,
            Field::Rows => Field::Duration,
            Field::Cols => Field::Rows,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Duration => "Game Duration:",
            Field::Rows => "Number of Rows:",
            Field::Cols => "Number of Columns:",
        }
    }
}

/// Raw text typed into the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsForm {
    pub duration: String,
    pub rows: String,
    pub cols: String,
    /// Field receiving keystrokes.
    pub focus: Field,
    /// Warning from the last rejected submit.
    pub error: Option<String>,
}

/// Longest text a form field accepts.
pub const FIELD_MAX_LEN: usize = 6;

impl SettingsForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Duration => &self.duration,
            Field::Rows => &self.rows,
            Field::Cols => &self.cols,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Duration => &mut self.duration,
            Field::Rows => &mut self.rows,
            Field::Cols => &mut self.cols,
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw terminal events.
///
/// The effects layer maps keys and clicks to Actions.
/// The transition function decides what each Action means per Screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Confirm / whack the cell under the cursor.
    Enter,
    /// Cancel / leave.
    Back,
    /// Focus the next form field.
    NextField,
    /// Focus the previous form field.
    PrevField,
    /// A printable character. Meaning depends on the screen.
    Char(char),
    /// Delete the last character of the focused field.
    Backspace,
    /// Mouse click on a grid cell (row-major index).
    SelectCell(usize),
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// Follows the Elm/TEA pattern: pure code describes WHAT should happen,
/// the effects boundary decides HOW.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this screen (may be the same or a different screen).
    Screen(Screen),
    /// Quit the application.
    Quit,
    /// Execute a side effect.
    Effect(Effect),
}

/// Side effect requested by a pure transition.
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Start both timers and a fresh session with these settings.
    StartSession(GameConfig),
    /// Stop both timers and append the final score to the score log.
    EndSession(GameSession),
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Custom mode: land on an empty settings form.
    pub fn custom() -> Self {
        App {
            screen: Screen::Settings(SettingsForm::default()),
            mode: Mode::Custom,
            generation: 0,
            should_quit: false,
        }
    }

    /// Classic mode: the caller starts the first session right away.
    pub fn classic() -> Self {
        App {
            screen: Screen::default(),
            mode: Mode::Classic,
            generation: 0,
            should_quit: false,
        }
    }
}

impl Screen {
    /// Playing screen with the cursor on the top-left cell.
    pub fn playing(session: GameSession) -> Self {
        Screen::Playing { session, cursor: 0 }
    }

    /// Settings form showing a warning.
    pub fn settings_with_error(form: SettingsForm, error: String) -> Self {
        Screen::Settings(SettingsForm {
            error: Some(error),
            ..form
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
