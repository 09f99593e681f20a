//! whack-a-mole CLI
//!
//! Hit the mole before it moves. Scores are appended to a plain-text log.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use whack_a_mole::logging;
use whack_a_mole::report::format_history;
use whack_a_mole::score_log::read_history;
use whack_a_mole::settings::validate_duration;
use whack_a_mole::tui;
use whack_a_mole::types::{
    AppConfig, GameConfig, GridSize, Mode, OutputFormat, CLASSIC_DURATION_SECS, DEFAULT_SCORE_FILE,
};

#[derive(Parser)]
#[command(name = "whack-a-mole")]
#[command(about = "Hit the mole before it moves")]
#[command(version)]
struct Cli {
    /// Score log that completed games are appended to
    #[arg(long, global = true, default_value = DEFAULT_SCORE_FILE)]
    score_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game on a 3x3 board (default)
    Classic {
        /// Game length in seconds (15-60)
        #[arg(long, default_value_t = CLASSIC_DURATION_SECS)]
        duration: u32,
    },

    /// Choose duration and board size before each game
    Custom,

    /// Show scores recorded in the score log
    Scores {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&logging::default_log_path());

    let command = cli.command.unwrap_or(Commands::Classic {
        duration: CLASSIC_DURATION_SECS,
    });

    let result = match command {
        Commands::Classic { duration } => cmd_play(Mode::Classic, duration, cli.score_file),
        Commands::Custom => cmd_play(Mode::Custom, CLASSIC_DURATION_SECS, cli.score_file),
        Commands::Scores { format } => cmd_scores(&cli.score_file, format.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting with failure");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_play(mode: Mode, duration: u32, score_file: PathBuf) -> Result<(), String> {
    let duration_secs = validate_duration(duration).map_err(|e| e.to_string())?;

    let config = AppConfig {
        mode,
        classic: GameConfig {
            duration_secs,
            grid: GridSize::CLASSIC,
        },
        score_file,
    };

    tracing::info!(?mode, score_file = %config.score_file.display(), "starting");
    tui::run::run(config).map_err(|e| e.to_string())
}

fn cmd_scores(score_file: &Path, format: OutputFormat) -> Result<(), String> {
    let history = read_history(score_file).map_err(|e| e.to_string())?;
    print!("{}", format_history(&history, format));
    Ok(())
}
