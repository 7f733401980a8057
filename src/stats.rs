use crate::app_dirs::AppDirs;
use crate::config::TestMode;
use crate::scoring::ResultRecord;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// One row of a user's result history, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub wpm: u32,
    pub accuracy: u32,
    pub test_type: String,
    pub test_option: u32,
    pub date: DateTime<Local>,
}

/// Aggregates for one `(mode, option)` pair: best over all recorded runs,
/// averages over the most recent ten.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub tests_completed: i64,
    pub best_wpm: u32,
    pub average_wpm: f64,
    pub average_accuracy: f64,
    pub history: Vec<HistoryEntry>,
}

impl StatsSummary {
    fn empty() -> Self {
        Self {
            tests_completed: 0,
            best_wpm: 0,
            average_wpm: 0.0,
            average_accuracy: 0.0,
            history: Vec::new(),
        }
    }
}

/// SQLite store for finished results. The engine hands each result over at
/// most once and never retries a failed insert.
#[derive(Debug)]
pub struct ResultsDb {
    conn: Connection,
}

impl ResultsDb {
    /// Open (and if needed create) the database at the default state path.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("tempo_results.db"));
        Self::open(&db_path)
    }

    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(ResultsDb { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS test_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                wpm INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                test_type TEXT NOT NULL,
                test_option INTEGER NOT NULL,
                duration_secs INTEGER,
                word_count INTEGER,
                date TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_test_results_user_date ON test_results(user, date)",
            [],
        )?;

        Ok(())
    }

    /// Persist one finished run attributed to `user`.
    pub fn save_result(&self, user: &str, record: &ResultRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO test_results
            (user, wpm, accuracy, test_type, test_option, duration_secs, word_count, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                user,
                record.wpm,
                record.accuracy,
                record.test_type.to_string(),
                record.test_option,
                record.duration_secs,
                record.word_count,
                Local::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Aggregate a user's runs for one `(mode, option)` pair. Missing data
    /// yields zeroed stats rather than an error.
    pub fn stats_for(&self, user: &str, mode: TestMode, option: u32) -> Result<StatsSummary> {
        let mode = mode.to_string();

        let (tests_completed, best_wpm): (i64, u32) = self.conn.query_row(
            r#"
            SELECT COUNT(*), COALESCE(MAX(wpm), 0)
            FROM test_results
            WHERE user = ?1 AND test_type = ?2 AND test_option = ?3
            "#,
            params![user, mode, option],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        if tests_completed == 0 {
            return Ok(StatsSummary::empty());
        }

        let (average_wpm, average_accuracy): (f64, f64) = self.conn.query_row(
            r#"
            SELECT ROUND(AVG(wpm), 1), ROUND(AVG(accuracy), 1)
            FROM (
                SELECT wpm, accuracy
                FROM test_results
                WHERE user = ?1 AND test_type = ?2 AND test_option = ?3
                ORDER BY date DESC, id DESC
                LIMIT 10
            )
            "#,
            params![user, mode, option],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT wpm, accuracy, test_type, test_option, date
            FROM test_results
            WHERE user = ?1 AND test_type = ?2 AND test_option = ?3
            ORDER BY date DESC, id DESC
            LIMIT 10
            "#,
        )?;

        let history_iter = stmt.query_map(params![user, mode, option], |row| {
            let date_str: String = row.get(4)?;
            let date = DateTime::parse_from_rfc3339(&date_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        4,
                        "date".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(HistoryEntry {
                wpm: row.get(0)?,
                accuracy: row.get(1)?,
                test_type: row.get(2)?,
                test_option: row.get(3)?,
                date,
            })
        })?;

        let mut history = Vec::new();
        for entry in history_iter {
            history.push(entry?);
        }

        Ok(StatsSummary {
            tests_completed,
            best_wpm,
            average_wpm,
            average_accuracy,
            history,
        })
    }
}
