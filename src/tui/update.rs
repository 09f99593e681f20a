//! Pure state transitions: (Screen, Action) → Transition.
//!
//! This is the core logic of the TUI. Fully testable without a terminal.
//! Each screen defines which actions it accepts. Unhandled actions
//! return the current screen unchanged (no-op).
//!
//! Randomness is injected so tests can replay mole placement exactly.

use rand::Rng;

use crate::game::{GameEvent, GameSession, Outcome};
use crate::settings::parse_settings;
use crate::types::{Mode, TimerId};

use super::state::{Action, Effect, FIELD_MAX_LEN, Screen, SettingsForm, Transition};

/// Pure state transition function for user actions.
pub fn update(screen: Screen, action: &Action, mode: Mode, rng: &mut impl Rng) -> Transition {
    match screen {
        Screen::Settings(form) => update_settings(form, action),
        Screen::Playing { session, cursor } => update_playing(session, cursor, action, rng),
        Screen::GameOver { session, saved } => update_game_over(session, saved, action, mode),
        Screen::PlayAgain => update_play_again(action),
    }
}

/// Pure state transition function for timer ticks.
///
/// Only a running session reacts. The tick that ends the session turns
/// into an `EndSession` effect carrying the finished session.
pub fn handle_tick(screen: Screen, timer: TimerId, rng: &mut impl Rng) -> Transition {
    match screen {
        Screen::Playing { mut session, cursor } => {
            match session.apply(GameEvent::Tick(timer), rng) {
                Outcome::Finished { .. } => Transition::Effect(Effect::EndSession(session)),
                _ => Transition::Screen(Screen::Playing { session, cursor }),
            }
        }
        other => Transition::Screen(other),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Settings: typing, field focus, submit, cancel.
fn update_settings(mut form: SettingsForm, action: &Action) -> Transition {
    match action {
        Action::Char(c) if !c.is_control() => {
            let value = form.value_mut(form.focus);
            if value.chars().count() < FIELD_MAX_LEN {
                value.push(*c);
            }
            Transition::Screen(Screen::Settings(form))
        }
        Action::Backspace => {
            form.value_mut(form.focus).pop();
            Transition::Screen(Screen::Settings(form))
        }
        Action::NextField | Action::MoveDown => {
            form.focus = form.focus.next();
            Transition::Screen(Screen::Settings(form))
        }
        Action::PrevField | Action::MoveUp => {
            form.focus = form.focus.prev();
            Transition::Screen(Screen::Settings(form))
        }
        Action::Enter => match parse_settings(&form.duration, &form.rows, &form.cols) {
            Ok(config) => Transition::Effect(Effect::StartSession(config)),
            Err(e) => {
                tracing::debug!(error = %e, "settings rejected");
                Transition::Screen(Screen::settings_with_error(form, e.to_string()))
            }
        },
        // Cancelling the form exits the game.
        Action::Back | Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Settings(form)),
    }
}

/// Playing: cursor movement and whacking.
fn update_playing(
    mut session: GameSession,
    cursor: usize,
    action: &Action,
    rng: &mut impl Rng,
) -> Transition {
    let size = session.grid().size();
    let (row, col) = (cursor / size.cols, cursor % size.cols);

    let cursor = match action {
        Action::MoveUp | Action::Char('k') => row.saturating_sub(1) * size.cols + col,
        Action::MoveDown | Action::Char('j') => (row + 1).min(size.rows - 1) * size.cols + col,
        Action::MoveLeft | Action::Char('h') => row * size.cols + col.saturating_sub(1),
        Action::MoveRight | Action::Char('l') => row * size.cols + (col + 1).min(size.cols - 1),
        Action::Enter | Action::Char(' ') => {
            whack(&mut session, cursor, rng);
            cursor
        }
        Action::SelectCell(index) => {
            whack(&mut session, *index, rng);
            cursor
        }
        Action::Char(c @ '1'..='9') => {
            let index = (*c as u8 - b'1') as usize;
            whack(&mut session, index, rng);
            cursor
        }
        Action::Back | Action::Char('q') | Action::Quit => return Transition::Quit,
        _ => cursor,
    };

    Transition::Screen(Screen::Playing { session, cursor })
}

fn whack(session: &mut GameSession, index: usize, rng: &mut impl Rng) {
    if let Outcome::Hit { score, next } = session.apply(GameEvent::CellSelected(index), rng) {
        tracing::debug!(index, score, next, "mole hit");
    }
}

/// GameOver: acknowledge the notice. Classic exits, custom asks to replay.
fn update_game_over(session: GameSession, saved: bool, action: &Action, mode: Mode) -> Transition {
    match action {
        Action::Enter | Action::Back | Action::Char(' ') => match mode {
            Mode::Classic => Transition::Quit,
            Mode::Custom => Transition::Screen(Screen::PlayAgain),
        },
        Action::Quit | Action::Char('q') => Transition::Quit,
        _ => Transition::Screen(Screen::GameOver { session, saved }),
    }
}

/// PlayAgain: yes (the default) reopens the form, no exits.
fn update_play_again(action: &Action) -> Transition {
    match action {
        Action::Enter | Action::Char('y') | Action::Char('Y') => {
            Transition::Screen(Screen::Settings(SettingsForm::default()))
        }
        Action::Back | Action::Char('n') | Action::Char('N') | Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::PlayAgain),
    }
}

// ============================================================================
// TESTS
// ============================================================================
