//! shortlist - Application Review Dashboard
//!
//! A terminal dashboard for reviewing candidate applications. Decisions
//! are stored locally as they are made and can be exported as CSV.

use std::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use shortlist::application::{App, AppMode};
use shortlist::domain::{ApplicationStore, KeyValueStore};
use shortlist::infrastructure::{init_tracing, Config, CsvFileSaver, FileStorage};
use shortlist::presentation::{render_ui, InputHandler};

/// Entry point for the review dashboard.
///
/// Loads configuration, opens the application store (seeding it on first
/// run), then runs the terminal UI until the user quits.
///
/// # Errors
///
/// Returns an error if the config cannot be read, the store cannot be
/// opened, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.logging, &config.log_file())?;

    let store = ApplicationStore::open(FileStorage::new(config.data_dir()))?;
    let mut app = App::new(store, CsvFileSaver::new(config.export_dir()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    loop_result(res)
}

/// Logs a failed terminal loop and hands the error back so the process
/// exits with a failure status.
fn loop_result(res: io::Result<()>) -> Result<(), Box<dyn std::error::Error>> {
    res.map_err(|err| {
        tracing::error!(error = %err, "terminal loop failed");
        err.into()
    })
}

/// Draws the dashboard and dispatches key presses until 'q' is pressed in
/// normal mode.
fn run_app<B: Backend, S: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<S>) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_error_is_returned() {
        let res = loop_result(Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone")));
        assert_eq!(res.unwrap_err().to_string(), "terminal gone");
    }

    #[test]
    fn test_clean_loop_exit() {
        assert!(loop_result(Ok(())).is_ok());
    }
}
