use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyrush::{
    app::{App, AppAction},
    config::{Config, ConfigStore, FileConfigStore},
    engine::TypingEngine,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    samples::SampleTexts,
    session::{SessionConfig, SessionDuration},
    telemetry,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
};
use tracing::{info, warn};

/// typing speed practice with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a sample text against the clock. WPM and accuracy update as you type; the run ends when the text is complete or time runs out."
)]
pub struct Cli {
    /// number of seconds per test (defaults to the last used value)
    #[clap(short = 's', long, value_enum)]
    secs: Option<SessionDuration>,

    /// index of the sample text to start with (wraps around)
    #[clap(short = 't', long)]
    text: Option<usize>,

    /// write logs to this file (also settable via KEYRUSH_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command-line values win over stored preferences
    fn session_config(&self, stored: &Config) -> SessionConfig {
        let base = stored.session_config();
        SessionConfig {
            duration: self.secs.unwrap_or(base.duration),
            text_index: self.text.unwrap_or(base.text_index),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init_tracing(cli.log_file.as_deref(), "info");

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let settings = cli.session_config(&store.load());
    let samples = SampleTexts::builtin()?;
    info!(
        duration = settings.duration.secs(),
        text_index = settings.text_index,
        "starting"
    );
    let mut app = App::new(TypingEngine::new(samples, settings));

    let mut terminal = setup_terminal()?;
    let outcome = start_tui(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    if let Err(err) = store.save(&Config::from(app.session_config())) {
        warn!(path = %store.path().display(), %err, "failed to save config");
    }

    outcome
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    undo_on_err(execute!(stdout, EnterAlternateScreen), || {
        let _ = disable_raw_mode();
    })?;
    undo_on_err(Terminal::new(CrosstermBackend::new(stdout)), || {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    })
}

/// Runs every teardown step even if an earlier one fails
fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw.and(screen).and(cursor)
}

/// Run `undo` before handing back an error, so a half-done setup is rolled back
fn undo_on_err<T, E>(result: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Closed => break,
            AppEvent::Key(key) => {
                if app.on_key(key) == AppAction::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["keyrush"]);

        assert_eq!(cli.secs, None);
        assert_eq!(cli.text, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_secs() {
        let cli = Cli::parse_from(["keyrush", "-s", "15"]);
        assert_eq!(cli.secs, Some(SessionDuration::Fifteen));

        let cli = Cli::parse_from(["keyrush", "--secs", "60"]);
        assert_eq!(cli.secs, Some(SessionDuration::Sixty));
    }

    #[test]
    fn test_cli_rejects_unsupported_secs() {
        assert!(Cli::try_parse_from(["keyrush", "-s", "45"]).is_err());
    }

    #[test]
    fn test_cli_text_and_log_file() {
        let cli = Cli::parse_from(["keyrush", "-t", "2", "--log-file", "/tmp/k.log"]);
        assert_eq!(cli.text, Some(2));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/k.log")));
    }

    #[test]
    fn test_undo_on_err_only_runs_on_failure() {
        let mut undone = false;
        let ok: Result<u8, &str> = undo_on_err(Ok(1), || undone = true);
        assert_eq!(ok, Ok(1));
        assert!(!undone);

        let err: Result<u8, &str> = undo_on_err(Err("no tty"), || undone = true);
        assert_eq!(err, Err("no tty"));
        assert!(undone);
    }

    #[test]
    fn test_cli_overrides_stored_config() {
        let stored = Config {
            duration_secs: 60,
            text_index: 1,
        };

        let cli = Cli::parse_from(["keyrush"]);
        assert_eq!(
            cli.session_config(&stored),
            SessionConfig {
                duration: SessionDuration::Sixty,
                text_index: 1,
            }
        );

        let cli = Cli::parse_from(["keyrush", "-s", "15", "-t", "0"]);
        assert_eq!(
            cli.session_config(&stored),
            SessionConfig {
                duration: SessionDuration::Fifteen,
                text_index: 0,
            }
        );
    }
}
