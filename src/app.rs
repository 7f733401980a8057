use crate::config::TestConfig;
use crate::engine::Engine;
use crate::stats::{ResultsDb, StatsSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
    Stats,
}

/// Outcome of handing the finished result to the persistence collaborator.
/// A failed submission is reported and dropped; the result itself stays on
/// screen either way.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Pending,
    Unauthenticated,
    Unavailable,
    Saved,
    Failed(String),
}

/// Top-level application state: the engine plus the screen being shown and
/// the bookkeeping around result submission.
#[derive(Debug)]
pub struct App {
    pub engine: Engine,
    pub state: AppState,
    pub user: Option<String>,
    pub db: Option<ResultsDb>,
    pub submission: Submission,
    pub stats: Option<StatsSummary>,
}

impl App {
    pub fn new(config: TestConfig, user: Option<String>) -> Self {
        Self::with_db(Engine::new(config), user, ResultsDb::new().ok())
    }

    pub fn with_db(engine: Engine, user: Option<String>, db: Option<ResultsDb>) -> Self {
        Self {
            engine,
            state: AppState::Typing,
            user,
            db,
            submission: Submission::Pending,
            stats: None,
        }
    }

    /// Called when the engine reaches Complete: move to the results screen
    /// and hand the record over, at most once per run. Unauthenticated runs
    /// are displayed but never persisted.
    pub fn finish_run(&mut self) {
        if self.state != AppState::Typing {
            return;
        }
        self.state = AppState::Results;
        self.submission = self.submit_result();
    }

    fn submit_result(&self) -> Submission {
        let Some(record) = self.engine.result() else {
            return Submission::Pending;
        };
        let Some(user) = self.user.as_deref() else {
            return Submission::Unauthenticated;
        };
        let Some(db) = self.db.as_ref() else {
            return Submission::Unavailable;
        };

        match db.save_result(user, record) {
            Ok(()) => Submission::Saved,
            Err(e) => Submission::Failed(e.to_string()),
        }
    }

    /// Load the history for the just-finished configuration and switch to
    /// the stats screen.
    pub fn show_stats(&mut self) {
        self.stats = match (self.user.as_deref(), self.db.as_ref()) {
            (Some(user), Some(db)) => {
                let config = self.engine.config();
                db.stats_for(user, config.mode(), config.limit()).ok()
            }
            _ => None,
        };
        self.state = AppState::Stats;
    }

    /// Abandon or leave the current run and start over with fresh text.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.state = AppState::Typing;
        self.submission = Submission::Pending;
        self.stats = None;
    }
}
