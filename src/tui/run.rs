//! TUI effects boundary: event loop, terminal lifecycle, timers, input mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui.
//!
//! Architecture: producer threads feed a single mpsc channel.
//! - Terminal reader thread: forwards key, mouse and resize events
//! - Mole timer and countdown timer: one thread each, ticking every second
//!
//! The event loop consumes from the channel on this thread, so every
//! state transition is serialized here.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::game::GameSession;
use crate::score_log::append_score;
use crate::types::{AppConfig, GameConfig, Mode, TimerId, TICK_PERIOD};

use super::state::{Action, App, AppEvent, Effect, Screen, Transition};
use super::update::{handle_tick, update};
use super::view::{cell_at, render};

// ============================================================================
// INPUT MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Char(c)),
        _ => None,
    }
}

/// Map a left click on a grid cell to `SelectCell`.
///
/// Only the playing screen has clickable cells. `frame_area` is the area
/// of the last drawn frame, so hit-testing matches what is on screen.
pub fn map_mouse(mouse: MouseEvent, frame_area: Rect, screen: &Screen) -> Option<Action> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    match screen {
        Screen::Playing { session, .. } => {
            cell_at(frame_area, session.grid().size(), mouse.column, mouse.row)
                .map(Action::SelectCell)
        }
        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards them to the channel.
fn spawn_terminal_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let app_event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                Ok(Event::Resize(..)) => AppEvent::Resize,
                Ok(_) => continue, // key releases, focus, paste
                Err(_) => break,
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

/// The two timers of one session, sharing a stop flag.
#[derive(Debug)]
struct Timers {
    stop: Arc<AtomicBool>,
}

impl Timers {
    /// Start the mole timer and the countdown timer for `generation`.
    fn start(generation: u64, period: Duration, tx: &mpsc::Sender<AppEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        for timer in [TimerId::Mole, TimerId::Countdown] {
            spawn_timer(timer, generation, period, Arc::clone(&stop), tx.clone());
        }
        Timers { stop }
    }

    fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_timer(
    timer: TimerId,
    generation: u64,
    period: Duration,
    stop: Arc<AtomicBool>,
    tx: mpsc::Sender<AppEvent>,
) {
    thread::spawn(move || {
        loop {
            thread::sleep(period);
            if stop.load(Ordering::Relaxed) {
                break;
            }
            if tx.send(AppEvent::Tick { timer, generation }).is_err() {
                break;
            }
        }
    });
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Owns everything effects need: the channel for new timers, the running
/// timers, the score log location and the rng.
struct Driver {
    tx: mpsc::Sender<AppEvent>,
    timers: Option<Timers>,
    tick_period: Duration,
    score_file: PathBuf,
    rng: StdRng,
}

impl Driver {
    fn new(tx: mpsc::Sender<AppEvent>, score_file: PathBuf) -> Self {
        Driver {
            tx,
            timers: None,
            tick_period: TICK_PERIOD,
            score_file,
            rng: StdRng::from_entropy(),
        }
    }

    fn stop_timers(&mut self) {
        if let Some(timers) = self.timers.take() {
            timers.stop();
        }
    }

    /// Handle a side effect requested by a pure transition.
    fn handle_effect(&mut self, effect: Effect, app: &mut App) {
        match effect {
            Effect::StartSession(config) => self.start_session(config, app),
            Effect::EndSession(session) => {
                self.stop_timers();
                let score = session.score();
                tracing::info!(
                    generation = app.generation,
                    score,
                    placements = session.placements(),
                    "session finished"
                );
                // Losing a score line must not end the game.
                let saved = match append_score(&self.score_file, score) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "score not saved");
                        false
                    }
                };
                app.screen = Screen::GameOver { session, saved };
            }
        }
    }

    fn start_session(&mut self, config: GameConfig, app: &mut App) {
        self.stop_timers();
        app.generation += 1;
        let session = GameSession::start(&config, &mut self.rng);
        tracing::info!(
            generation = app.generation,
            duration_secs = config.duration_secs,
            grid = %config.grid,
            "session started"
        );
        self.timers = Some(Timers::start(app.generation, self.tick_period, &self.tx));
        app.screen = Screen::playing(session);
    }

    /// Apply a transition to the app.
    fn apply(&mut self, transition: Transition, app: &mut App) {
        match transition {
            Transition::Screen(screen) => app.screen = screen,
            Transition::Quit => app.should_quit = true,
            Transition::Effect(effect) => self.handle_effect(effect, app),
        }
    }

    /// Route one channel event through the pure layers.
    fn process(&mut self, event: AppEvent, app: &mut App, frame_area: Rect) {
        let transition = match event {
            AppEvent::Key(key) => map_key(key).map(|action| self.dispatch(&action, app)),
            AppEvent::Mouse(mouse) => {
                map_mouse(mouse, frame_area, &app.screen).map(|action| self.dispatch(&action, app))
            }
            AppEvent::Resize => None,
            AppEvent::Tick { timer, generation } => {
                if generation == app.generation {
                    let screen = std::mem::take(&mut app.screen);
                    Some(handle_tick(screen, timer, &mut self.rng))
                } else {
                    None // tick from a stopped session
                }
            }
        };

        if let Some(transition) = transition {
            self.apply(transition, app);
        }
    }

    fn dispatch(&mut self, action: &Action, app: &mut App) -> Transition {
        let screen = std::mem::take(&mut app.screen);
        update(screen, action, app.mode, &mut self.rng)
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the game until the player quits.
///
/// Sets up the terminal, starts the first session (classic) or shows the
/// settings form (custom), and runs the event loop. The terminal is
/// restored even when the loop fails.
pub fn run(config: AppConfig) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_terminal_reader(tx.clone());

    let mut driver = Driver::new(tx, config.score_file);
    let mut app = match config.mode {
        Mode::Classic => {
            let mut app = App::classic();
            driver.start_session(config.classic, &mut app);
            app
        }
        Mode::Custom => App::custom(),
    };

    let result = event_loop(&mut terminal, &mut app, &mut driver, &rx);

    driver.stop_timers();
    restore_terminal()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    driver: &mut Driver,
    rx: &mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    let mut frame_area = Rect::default();

    loop {
        terminal.draw(|frame| {
            frame_area = frame.area();
            render(app, frame);
        })?;

        if app.should_quit {
            return Ok(());
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => return Ok(()), // all senders dropped
        };

        driver.process(event, app, frame_area);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::view::{cell_rects, main_areas};
    use crate::types::GridSize;
    use crossterm::event::KeyEventState;
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Driver with timers that never fire during a test.
    fn test_driver(score_file: PathBuf) -> (Driver, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let driver = Driver {
            tx,
            timers: None,
            tick_period: Duration::from_secs(3600),
            score_file,
            rng: StdRng::seed_from_u64(5),
        };
        (driver, rx)
    }

    fn custom_config(duration_secs: u32) -> GameConfig {
        GameConfig {
            duration_secs,
            grid: GridSize::CLASSIC,
        }
    }

    fn tick(timer: TimerId, generation: u64) -> AppEvent {
        AppEvent::Tick { timer, generation }
    }

    // -- Key mapping --

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(map_key(key(KeyCode::Up)), Some(Action::MoveUp));
        assert_eq!(map_key(key(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(map_key(key(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(map_key(key(KeyCode::Right)), Some(Action::MoveRight));
    }

    #[test]
    fn form_keys_map_to_form_actions() {
        assert_eq!(map_key(key(KeyCode::Tab)), Some(Action::NextField));
        assert_eq!(map_key(key(KeyCode::BackTab)), Some(Action::PrevField));
        assert_eq!(map_key(key(KeyCode::Backspace)), Some(Action::Backspace));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Back));
    }

    #[test]
    fn printable_keys_pass_through() {
        assert_eq!(map_key(key(KeyCode::Char('7'))), Some(Action::Char('7')));
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Action::Char('q')));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::F(5))), None);
    }

    #[test]
    fn key_event_state_is_irrelevant() {
        let mut k = key(KeyCode::Enter);
        k.state = KeyEventState::CAPS_LOCK;
        assert_eq!(map_key(k), Some(Action::Enter));
    }

    // -- Mouse mapping --

    #[test]
    fn click_on_cell_selects_it() {
        let session = GameSession::start(&custom_config(30), &mut StdRng::seed_from_u64(1));
        let screen = Screen::playing(session);
        let area = Rect::new(0, 0, 90, 34);
        // Board starts below title (1) and status (2); 3 rows of 10 lines.
        assert_eq!(map_mouse(click(1, 4), area, &screen), Some(Action::SelectCell(0)));
        assert_eq!(map_mouse(click(89, 32), area, &screen), Some(Action::SelectCell(8)));
    }

    #[test]
    fn clicks_outside_play_are_ignored() {
        let area = Rect::new(0, 0, 90, 34);
        assert_eq!(map_mouse(click(10, 10), area, &Screen::PlayAgain), None);
    }

    #[test]
    fn non_left_clicks_are_ignored() {
        let session = GameSession::start(&custom_config(30), &mut StdRng::seed_from_u64(1));
        let screen = Screen::playing(session);
        let mut right = click(1, 4);
        right.kind = MouseEventKind::Down(MouseButton::Right);
        assert_eq!(map_mouse(right, Rect::new(0, 0, 90, 34), &screen), None);
    }

    // -- Timers --

    #[test]
    fn timers_tick_both_ids_until_stopped() {
        let (tx, rx) = mpsc::channel();
        let timers = Timers::start(7, Duration::from_millis(5), &tx);

        let mut seen_mole = false;
        let mut seen_countdown = false;
        while !(seen_mole && seen_countdown) {
            match rx.recv_timeout(Duration::from_secs(2)).expect("timers should tick") {
                AppEvent::Tick { timer, generation } => {
                    assert_eq!(generation, 7);
                    seen_mole |= timer == TimerId::Mole;
                    seen_countdown |= timer == TimerId::Countdown;
                }
                other => panic!("unexpected event {:?}", other),
            }
        }

        timers.stop();
        thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {} // drain ticks sent before the stop
        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "stopped timers must stay silent");
    }

    // -- Driver --

    #[test]
    fn classic_fifteen_second_game_without_hits_logs_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("score.txt");
        let (mut driver, _rx) = test_driver(path.clone());
        let mut app = App::classic();
        driver.start_session(custom_config(15), &mut app);
        let generation = app.generation;

        for _ in 0..15 {
            driver.process(tick(TimerId::Mole, generation), &mut app, Rect::default());
            driver.process(tick(TimerId::Countdown, generation), &mut app, Rect::default());
        }

        assert!(matches!(app.screen, Screen::GameOver { saved: true, .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Score: 0\n");
        assert!(driver.timers.is_none(), "timers stop at game end");

        // Acknowledge the notice: classic closes.
        driver.process(AppEvent::Key(key(KeyCode::Enter)), &mut app, Rect::default());
        assert!(app.should_quit);
    }

    #[test]
    fn custom_flow_rejects_short_duration_then_plays_and_replays() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("score.txt");
        let (mut driver, _rx) = test_driver(path.clone());
        let mut app = App::custom();

        let type_text = |driver: &mut Driver, app: &mut App, text: &str| {
            for c in text.chars() {
                driver.process(AppEvent::Key(key(KeyCode::Char(c))), app, Rect::default());
            }
        };

        type_text(&mut driver, &mut app, "10");
        driver.process(AppEvent::Key(key(KeyCode::Tab)), &mut app, Rect::default());
        type_text(&mut driver, &mut app, "3");
        driver.process(AppEvent::Key(key(KeyCode::Tab)), &mut app, Rect::default());
        type_text(&mut driver, &mut app, "4");
        driver.process(AppEvent::Key(key(KeyCode::Enter)), &mut app, Rect::default());

        match &app.screen {
            Screen::Settings(form) => assert!(form.error.is_some(), "form re-shown with warning"),
            other => panic!("Expected Settings, got {:?}", other),
        }
        assert_eq!(app.generation, 0, "no session started");

        // Fix the duration: focus back on it, clear, retype.
        driver.process(AppEvent::Key(key(KeyCode::Tab)), &mut app, Rect::default());
        driver.process(AppEvent::Key(key(KeyCode::Backspace)), &mut app, Rect::default());
        driver.process(AppEvent::Key(key(KeyCode::Backspace)), &mut app, Rect::default());
        type_text(&mut driver, &mut app, "15");
        driver.process(AppEvent::Key(key(KeyCode::Enter)), &mut app, Rect::default());

        let generation = app.generation;
        assert_eq!(generation, 1);
        match &app.screen {
            Screen::Playing { session, .. } => {
                assert_eq!(session.grid().size(), GridSize::new(3, 4));
                assert_eq!(session.time_left(), 15);
            }
            other => panic!("Expected Playing, got {:?}", other),
        }

        // Click the mole once, then run out the clock.
        let mole = match &app.screen {
            Screen::Playing { session, .. } => session.grid().mole_index().unwrap(),
            _ => unreachable!(),
        };
        let area = Rect::new(0, 0, 90, 34);
        let [_, _, board, _] = main_areas(area);
        let target = cell_rects(board, GridSize::new(3, 4))[mole];
        driver.process(AppEvent::Mouse(click(target.x + 1, target.y + 1)), &mut app, area);
        for _ in 0..15 {
            driver.process(tick(TimerId::Countdown, generation), &mut app, Rect::default());
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "Score: 1\n");

        // Notice → replay prompt → yes → fresh form.
        driver.process(AppEvent::Key(key(KeyCode::Enter)), &mut app, Rect::default());
        assert_eq!(app.screen, Screen::PlayAgain);
        driver.process(AppEvent::Key(key(KeyCode::Char('y'))), &mut app, Rect::default());
        assert_eq!(app.screen, Screen::default());
        assert!(!app.should_quit);
    }

    #[test]
    fn stale_ticks_are_dropped() {
        let dir = TempDir::new().unwrap();
        let (mut driver, _rx) = test_driver(dir.path().join("score.txt"));
        let mut app = App::classic();
        driver.start_session(custom_config(30), &mut app);
        driver.start_session(custom_config(30), &mut app);
        assert_eq!(app.generation, 2);

        driver.process(tick(TimerId::Countdown, 1), &mut app, Rect::default());
        match &app.screen {
            Screen::Playing { session, .. } => assert_eq!(session.time_left(), 30),
            other => panic!("Expected Playing, got {:?}", other),
        }
    }

    #[test]
    fn unwritable_score_log_does_not_end_the_program() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("score.txt");
        let (mut driver, _rx) = test_driver(path);
        let mut app = App::custom();
        driver.start_session(custom_config(15), &mut app);
        let generation = app.generation;

        for _ in 0..15 {
            driver.process(tick(TimerId::Countdown, generation), &mut app, Rect::default());
        }

        assert!(matches!(app.screen, Screen::GameOver { saved: false, .. }));
        assert!(!app.should_quit);
    }

    #[test]
    fn ticks_after_game_over_change_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("score.txt");
        let (mut driver, _rx) = test_driver(path.clone());
        let mut app = App::classic();
        driver.start_session(custom_config(15), &mut app);
        let generation = app.generation;
        for _ in 0..15 {
            driver.process(tick(TimerId::Countdown, generation), &mut app, Rect::default());
        }
        let before = app.screen.clone();

        driver.process(tick(TimerId::Countdown, generation), &mut app, Rect::default());
        driver.process(tick(TimerId::Mole, generation), &mut app, Rect::default());

        assert_eq!(app.screen, before);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Score: 0\n");
    }
}
