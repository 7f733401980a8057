use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Time limits a timed run may be configured with, in whole seconds.
pub const TIME_LIMITS: [u32; 4] = [15, 30, 60, 120];
/// Word limits a word-count run may be configured with.
pub const WORD_LIMITS: [u32; 3] = [50, 100, 150];

/// Words materialized up front for a timed run, so the typist never runs out
/// of text before the timer expires.
pub const TIMED_PASSAGE_WORDS: usize = 300;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TestMode {
    Time,
    Words,
}

/// Rejected mode/limit combinations. Limits outside the enumerated sets are
/// errors, never clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownTimeLimit(u32),
    UnknownWordLimit(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownTimeLimit(secs) => {
                write!(f, "unsupported time limit {secs}s (choose one of 15, 30, 60, 120)")
            }
            ConfigError::UnknownWordLimit(count) => {
                write!(f, "unsupported word limit {count} (choose one of 50, 100, 150)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated configuration of a single test run. Immutable for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestConfig {
    mode: TestMode,
    limit: u32,
    pub punctuation: bool,
    pub numbers: bool,
}

impl TestConfig {
    pub fn new(
        mode: TestMode,
        limit: u32,
        punctuation: bool,
        numbers: bool,
    ) -> Result<Self, ConfigError> {
        match mode {
            TestMode::Time if !TIME_LIMITS.contains(&limit) => {
                return Err(ConfigError::UnknownTimeLimit(limit));
            }
            TestMode::Words if !WORD_LIMITS.contains(&limit) => {
                return Err(ConfigError::UnknownWordLimit(limit));
            }
            _ => {}
        }

        Ok(Self {
            mode,
            limit,
            punctuation,
            numbers,
        })
    }

    pub fn mode(&self) -> TestMode {
        self.mode
    }

    /// The configured stop condition: seconds in time mode, words otherwise.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// How many words to materialize at test start.
    pub fn passage_word_count(&self) -> usize {
        match self.mode {
            TestMode::Words => self.limit as usize,
            TestMode::Time => TIMED_PASSAGE_WORDS,
        }
    }
}

/// Settings persisted between sessions, including the signed-in user the
/// finished results are attributed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub mode: TestMode,
    pub time_limit: u32,
    pub word_limit: u32,
    pub punctuation: bool,
    pub numbers: bool,
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: TestMode::Time,
            time_limit: 60,
            word_limit: 50,
            punctuation: false,
            numbers: false,
            user: None,
        }
    }
}

impl Config {
    /// Validate the saved settings into a run configuration.
    pub fn test_config(&self) -> Result<TestConfig, ConfigError> {
        let limit = match self.mode {
            TestMode::Time => self.time_limit,
            TestMode::Words => self.word_limit,
        };
        TestConfig::new(self.mode, limit, self.punctuation, self.numbers)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "tempo") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tempo_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
