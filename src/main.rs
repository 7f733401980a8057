use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::{self, Sender},
};

use tempo::{
    app::{App, AppState},
    config::{Config, ConfigStore, FileConfigStore, TestConfig, TestMode},
    engine::Phase,
    runtime::{self, CountdownTimer, Event, Runner},
};

/// minimal typing speed test with timed and word-count runs
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing speed test. Race the clock or type a fixed number of \
                  words; results are scored in wpm and accuracy and, when a user is set, \
                  tracked across runs."
)]
pub struct Cli {
    /// test mode
    #[clap(short, long, value_enum)]
    mode: Option<TestMode>,

    /// seconds on the clock in time mode (15, 30, 60 or 120)
    #[clap(short = 't', long)]
    time: Option<u32>,

    /// words to type in words mode (50, 100 or 150)
    #[clap(short = 'w', long)]
    words: Option<u32>,

    /// decorate generated words with punctuation
    #[clap(long)]
    punctuation: bool,

    /// prefix generated words with small numbers
    #[clap(long)]
    numbers: bool,

    /// user the finished results are attributed to
    #[clap(short, long)]
    user: Option<String>,
}

/// Merge the CLI over the saved defaults and validate the combination.
/// Invalid limits are a configuration error and never reach the engine.
fn resolve_config(cli: &Cli, saved: &Config) -> (TestConfig, Config) {
    let mode = match (cli.mode, cli.time, cli.words) {
        (Some(mode), _, _) => mode,
        (None, Some(_), None) => TestMode::Time,
        (None, None, Some(_)) => TestMode::Words,
        (None, Some(_), Some(_)) => {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::ArgumentConflict,
                "both --time and --words given; pick one with --mode",
            )
            .exit();
        }
        (None, None, None) => saved.mode,
    };

    let updated = Config {
        mode,
        time_limit: cli.time.unwrap_or(saved.time_limit),
        word_limit: cli.words.unwrap_or(saved.word_limit),
        punctuation: saved.punctuation,
        numbers: saved.numbers,
        user: cli.user.clone().or_else(|| saved.user.clone()),
    };

    let punctuation = cli.punctuation || saved.punctuation;
    let numbers = cli.numbers || saved.numbers;

    let limit = match mode {
        TestMode::Time => updated.time_limit,
        TestMode::Words => updated.word_limit,
    };

    match TestConfig::new(mode, limit, punctuation, numbers) {
        Ok(config) => (config, updated),
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, err).exit();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let saved = store.load();
    let (test_config, updated) = resolve_config(&cli, &saved);
    let _ = store.save(&updated);

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(test_config, updated.user.clone());
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel();
    runtime::spawn_input_thread(tx.clone());
    let runner = Runner::new(rx);

    // handle to the countdown of the run in flight, if any
    let mut timer: Option<CountdownTimer> = None;

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while let Some(event) = runner.step() {
        match event {
            Event::Tick { epoch } => {
                app.engine.on_tick(epoch);
            }
            Event::Resize => {}
            Event::Key(key) => {
                if !handle_key(app, key, &mut timer, &tx) {
                    break;
                }
            }
        }

        // the engine reached Complete under this event; stop the countdown
        // and hand the result over exactly once
        if app.engine.phase() == Phase::Complete && app.state == AppState::Typing {
            if let Some(t) = timer.take() {
                t.cancel();
            }
            app.finish_run();
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    if let Some(t) = timer.take() {
        t.cancel();
    }

    Ok(())
}

/// Dispatch one key event. Returns false when the app should exit.
fn handle_key(
    app: &mut App,
    key: KeyEvent,
    timer: &mut Option<CountdownTimer>,
    tx: &Sender<Event>,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return false;
    }

    if key.code == KeyCode::Esc {
        if let Some(t) = timer.take() {
            t.cancel();
        }
        app.reset();
        return true;
    }

    match app.state {
        AppState::Typing => match key.code {
            KeyCode::Backspace => app.engine.backspace(),
            KeyCode::Char(c) => {
                let was_idle = app.engine.phase() == Phase::Idle;
                app.engine.type_char(c);

                // the first keystroke started the run; arm its countdown
                if was_idle
                    && app.engine.phase() == Phase::Running
                    && app.engine.config().mode() == TestMode::Time
                {
                    *timer = Some(CountdownTimer::spawn(tx.clone(), app.engine.epoch()));
                }
            }
            _ => {}
        },
        AppState::Results => match key.code {
            KeyCode::Char('r') => app.reset(),
            KeyCode::Char('s') => app.show_stats(),
            KeyCode::Char('q') => return false,
            _ => {}
        },
        AppState::Stats => match key.code {
            KeyCode::Char('b') | KeyCode::Backspace => app.state = AppState::Results,
            KeyCode::Char('r') => app.reset(),
            KeyCode::Char('q') => return false,
            _ => {}
        },
    }

    true
}
