//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen has a dedicated render function. The main `render()`
//! dispatches on the current Screen variant. Layout helpers are shared
//! with the effects layer so mouse hit-testing agrees with what is drawn.

use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::game::GameSession;
use crate::settings::{cols_hint, duration_hint, rows_hint};
use crate::types::{GridSize, Mode};

use super::state::{App, Field, Screen, SettingsForm};
use super::theme;

/// Seconds left at which the time gauge turns red.
const LOW_TIME_SECS: u32 = 5;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let [title, status, board, help] = main_areas(frame.area());

    frame.render_widget(render_title(app), title);
    frame.render_widget(render_help(&app.screen, app.mode), help);

    match &app.screen {
        Screen::Settings(form) => render_settings(form, frame, board),
        Screen::Playing { session, cursor } => {
            render_status(session, frame, status);
            render_board(session, Some(*cursor), frame, board);
        }
        Screen::GameOver { session, saved } => {
            render_status(session, frame, status);
            render_board(session, None, frame, board);
            render_game_over(session.score(), *saved, frame, board);
        }
        Screen::PlayAgain => render_play_again(frame, board),
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Split the frame into title, status, board and help areas.
pub fn main_areas(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Length(2), // score + time gauge
        Constraint::Min(0),    // board / dialogs
        Constraint::Length(1), // help
    ])
    .areas(area)
}

/// Row-major rectangles of every cell, equally sized within `board`.
pub fn cell_rects(board: Rect, size: GridSize) -> Vec<Rect> {
    let rows = Layout::vertical(vec![Constraint::Ratio(1, size.rows as u32); size.rows]).split(board);
    rows.iter()
        .flat_map(|row| {
            Layout::horizontal(vec![Constraint::Ratio(1, size.cols as u32); size.cols])
                .split(*row)
                .to_vec()
        })
        .collect()
}

/// Cell index under a terminal position, given the whole frame area.
pub fn cell_at(frame_area: Rect, size: GridSize, column: u16, row: u16) -> Option<usize> {
    let [_, _, board, _] = main_areas(frame_area);
    let pos = Position::new(column, row);
    cell_rects(board, size).iter().position(|r| r.contains(pos))
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

// ============================================================================
// SHARED CHROME
// ============================================================================

fn render_title(app: &App) -> Paragraph<'static> {
    let context = match (&app.screen, app.mode) {
        (Screen::Settings(_), _) => "Game Settings".to_string(),
        (Screen::Playing { session, .. } | Screen::GameOver { session, .. }, Mode::Classic) => {
            format!("Classic {}", session.grid().size())
        }
        (Screen::Playing { session, .. } | Screen::GameOver { session, .. }, Mode::Custom) => {
            format!("Custom {}", session.grid().size())
        }
        (Screen::PlayAgain, _) => "Play Again?".to_string(),
    };

    Paragraph::new(Line::from(vec![
        Span::styled("Whack-a-Mole", theme::STYLE_TITLE),
        Span::styled(format!("  {}", context), theme::STYLE_DIM),
    ]))
}

fn render_help(screen: &Screen, mode: Mode) -> Paragraph<'static> {
    let help_text = match (screen, mode) {
        (Screen::Settings(_), _) => "[Tab/↑↓] field  [Enter] OK  [Esc] cancel",
        (Screen::Playing { .. }, _) => {
            "[click] whack  [←↓↑→/hjkl] move  [Enter/Space] whack  [1-9] cell  [q] quit"
        }
        (Screen::GameOver { .. }, Mode::Classic) => "[Enter] close",
        (Screen::GameOver { .. }, Mode::Custom) => "[Enter] continue",
        (Screen::PlayAgain, _) => "[Y/Enter] yes  [N/Esc] no",
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

// ============================================================================
// SCREEN: SETTINGS
// ============================================================================

fn render_settings(form: &SettingsForm, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 12, area);

    let mut lines = vec![Line::from("")];
    for field in Field::ALL {
        let value = form.value(field);
        let focused = field == form.focus;

        let input = if value.is_empty() {
            let hint = match field {
                Field::Duration => duration_hint(),
                Field::Rows => rows_hint(),
                Field::Cols => cols_hint(),
            };
            Span::styled(hint, theme::STYLE_DIM)
        } else if focused {
            Span::styled(format!("{}_", value), theme::STYLE_FOCUSED)
        } else {
            Span::styled(value.to_string(), theme::STYLE_IMPORTANT)
        };

        let marker = if focused {
            Span::styled(" > ", theme::STYLE_INTERACTIVE)
        } else {
            Span::raw("   ")
        };

        lines.push(Line::from(vec![
            marker,
            Span::raw(format!("{:<20}", field.label())),
            input,
        ]));
        lines.push(Line::from(""));
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" Invalid Input: {}", error),
            theme::STYLE_DANGER,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::bordered().title(" Game Settings "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

// ============================================================================
// SCREEN: PLAYING
// ============================================================================

fn render_status(session: &GameSession, frame: &mut Frame, area: Rect) {
    let [line, gauge_area] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let status = Line::from(vec![
        Span::styled(format!("Score: {}", session.score()), theme::STYLE_SAFE),
        Span::raw("    "),
        Span::raw("Time Left: "),
        Span::styled(session.time_left().to_string(), theme::STYLE_IMPORTANT),
    ]);
    frame.render_widget(Paragraph::new(status), line);

    let ratio = if session.duration_secs() == 0 {
        0.0
    } else {
        f64::from(session.time_left()) / f64::from(session.duration_secs())
    };
    let style = if session.time_left() <= LOW_TIME_SECS {
        theme::STYLE_PROGRESS_LOW
    } else {
        theme::STYLE_PROGRESS
    };
    let gauge = Gauge::default()
        .gauge_style(style)
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{}s", session.time_left()));
    frame.render_widget(gauge, gauge_area);
}

fn render_board(session: &GameSession, cursor: Option<usize>, frame: &mut Frame, area: Rect) {
    let grid = session.grid();
    let rects = cell_rects(area, grid.size());

    for (i, (cell, rect)) in grid.cells().iter().zip(rects).enumerate() {
        let mut block = Block::bordered();
        if i < 9 {
            block = block.title(Span::styled(format!("{}", i + 1), theme::STYLE_DIM));
        }
        block = if cursor == Some(i) {
            block.border_style(theme::STYLE_CURSOR)
        } else {
            block.border_style(theme::STYLE_HOLE)
        };

        let (label, style) = if cell.is_mole {
            ("MOLE", theme::STYLE_MOLE)
        } else {
            ("", theme::STYLE_HOLE)
        };

        // Vertically center the single label line inside the borders.
        let pad = rect.height.saturating_sub(3) / 2;
        let mut lines = vec![Line::from(""); pad as usize];
        lines.push(Line::from(Span::styled(label, style)));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, rect);
    }
}

// ============================================================================
// DIALOGS
// ============================================================================

fn render_game_over(score: u32, saved: bool, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(48, 7, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Time's up! Your final score is {}.", score),
            theme::STYLE_IMPORTANT,
        )),
    ];
    if !saved {
        lines.push(Line::from(Span::styled(
            "Score could not be saved (see log).",
            theme::STYLE_DANGER,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" Game Over "))
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn render_play_again(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(48, 6, area);

    let lines = vec![
        Line::from(""),
        Line::from("Would you like to play another game?"),
        Line::from(vec![
            Span::styled("[Y]", theme::STYLE_INTERACTIVE),
            Span::raw("es   "),
            Span::styled("[N]", theme::STYLE_INTERACTIVE),
            Span::raw("o"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" Play Again? "));
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEvent;
    use crate::types::{GameConfig, TimerId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 30);
        Terminal::new(backend).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn session(duration_secs: u32) -> GameSession {
        let config = GameConfig {
            duration_secs,
            grid: GridSize::CLASSIC,
        };
        GameSession::start(&config, &mut StdRng::seed_from_u64(3))
    }

    fn app(screen: Screen, mode: Mode) -> App {
        App {
            screen,
            mode,
            generation: 1,
            should_quit: false,
        }
    }

    #[test]
    fn playing_screen_shows_score_time_and_mole() {
        let mut terminal = make_terminal();
        let app = app(Screen::playing(session(30)), Mode::Classic);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Score: 0"));
        assert!(content.contains("Time Left: 30"));
        assert_eq!(content.matches("MOLE").count(), 1, "exactly one mole drawn");
    }

    #[test]
    fn settings_screen_shows_placeholders() {
        let mut terminal = make_terminal();
        let app = app(Screen::default(), Mode::Custom);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Game Duration:"));
        assert!(content.contains("(15-60 seconds)"));
        assert!(content.contains("Number of Columns:"));
    }

    #[test]
    fn settings_screen_shows_warning() {
        let mut terminal = make_terminal();
        let form = SettingsForm {
            error: Some("Please enter valid integer values.".into()),
            ..SettingsForm::default()
        };
        let app = app(Screen::Settings(form), Mode::Custom);
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Invalid Input"));
    }

    #[test]
    fn game_over_shows_final_score() {
        let mut s = session(15);
        let mut rng = StdRng::seed_from_u64(9);
        let mole = s.grid().mole_index().unwrap();
        s.apply(GameEvent::CellSelected(mole), &mut rng);
        for _ in 0..15 {
            s.apply(GameEvent::Tick(TimerId::Countdown), &mut rng);
        }

        let mut terminal = make_terminal();
        let app = app(Screen::GameOver { session: s, saved: false }, Mode::Custom);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("final score is 1."));
        assert!(content.contains("could not be saved"));
        assert!(!content.contains("MOLE"), "finished board has no mole");
    }

    #[test]
    fn play_again_prompt_renders() {
        let mut terminal = make_terminal();
        let app = app(Screen::PlayAgain, Mode::Custom);
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("play another game?"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        for screen in [
            Screen::default(),
            Screen::playing(session(30)),
            Screen::PlayAgain,
        ] {
            let app = app(screen, Mode::Custom);
            terminal
                .draw(|frame| render(&app, frame))
                .expect("every screen should render without panic");
        }
    }

    // -- Layout / hit-testing --

    #[test]
    fn cell_rects_cover_grid_row_major() {
        let board = Rect::new(0, 0, 30, 15);
        let rects = cell_rects(board, GridSize::CLASSIC);
        assert_eq!(rects.len(), 9);
        assert_eq!(rects[0], Rect::new(0, 0, 10, 5));
        assert_eq!(rects[4], Rect::new(10, 5, 10, 5));
        assert_eq!(rects[8], Rect::new(20, 10, 10, 5));
    }

    #[test]
    fn cell_at_agrees_with_cell_rects() {
        let area = Rect::new(0, 0, 80, 30);
        let size = GridSize::new(4, 5);
        let [_, _, board, _] = main_areas(area);
        for (i, rect) in cell_rects(board, size).iter().enumerate() {
            let hit = cell_at(area, size, rect.x + rect.width / 2, rect.y + rect.height / 2);
            assert_eq!(hit, Some(i));
        }
    }

    #[test]
    fn cell_at_outside_board_is_none() {
        let area = Rect::new(0, 0, 80, 30);
        // Row 0 is the title bar.
        assert_eq!(cell_at(area, GridSize::CLASSIC, 5, 0), None);
    }

    #[test]
    fn centered_rect_clips_to_area() {
        let area = Rect::new(2, 2, 10, 5);
        assert_eq!(centered_rect(100, 100, area), area);
        assert_eq!(centered_rect(4, 1, area), Rect::new(5, 4, 4, 1));
    }
}
