//! whack-a-mole: a terminal reflex game.

pub mod game;
pub mod logging;
pub mod report;
pub mod score_log;
pub mod settings;
pub mod tui;
pub mod types;
