//! TUI color semantics and style constants.
//!
//! Pure data, consumed by the rendering layer.
//!
//! Color semantics:
//! - Yellow on brown: the mole
//! - Cyan: interactive elements (cursor, focused field, key hints)
//! - Red: urgency (last seconds, validation warnings)
//! - Green: score
//! - Dim: empty holes, placeholders, help

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Warning / urgency: red.
pub const STYLE_DANGER: Style = Style::new().fg(Color::Red);

/// Success / points: green.
pub const STYLE_SAFE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Interactive element / keybinding hint: cyan.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// De-emphasized text: dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

/// Important text: bold.
pub const STYLE_IMPORTANT: Style = Style::new().add_modifier(Modifier::BOLD);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar / header.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// The cell holding the mole.
pub const STYLE_MOLE: Style = Style::new()
    .fg(Color::Yellow)
    .bg(Color::Rgb(110, 70, 30))
    .add_modifier(Modifier::BOLD);

/// An empty hole.
pub const STYLE_HOLE: Style = Style::new().fg(Color::DarkGray);

/// Border of the cell under the keyboard cursor.
pub const STYLE_CURSOR: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Focused form field.
pub const STYLE_FOCUSED: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

/// Time gauge fill.
pub const STYLE_PROGRESS: Style = Style::new().fg(Color::Cyan);

/// Time gauge fill during the last seconds.
pub const STYLE_PROGRESS_LOW: Style = Style::new().fg(Color::Red);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);
