use crate::config::TestMode;
use itertools::{EitherOrBoth, Itertools};
use std::time::SystemTime;

/// Metrics for one finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub wpm: u32,
    pub accuracy: u32,
}

/// The record handed to the persistence collaborator, exactly once per
/// completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub wpm: u32,
    /// Percentage in 0..=100.
    pub accuracy: u32,
    pub test_type: TestMode,
    /// The configured limit: seconds in time mode, words in words mode.
    pub test_option: u32,
    pub duration_secs: Option<u32>,
    pub word_count: Option<u32>,
}

/// Score a finished transcript against its target passage.
///
/// Pure: the same inputs always produce the same score, however many times
/// this is called. The transcript is expected to already carry the trimmed
/// in-flight partial as its final entry (`Transcript::final_words`).
///
/// Per word, characters are compared index-wise up to the shorter of the two
/// words; typed characters beyond the target's length count toward the total
/// but never toward the correct count, and a typed word with no target
/// contributes zero correct characters. WPM uses the standard five
/// characters-per-word convention.
pub fn score(
    transcript: &[String],
    target: &[String],
    started_at: SystemTime,
    now: SystemTime,
) -> Score {
    let mut correct_chars = 0usize;
    let mut total_chars = 0usize;

    for pair in transcript.iter().zip_longest(target.iter()) {
        match pair {
            EitherOrBoth::Both(typed, expected) => {
                correct_chars += typed
                    .chars()
                    .zip(expected.chars())
                    .filter(|(t, e)| t == e)
                    .count();
                total_chars += typed.chars().count();
            }
            EitherOrBoth::Left(typed) => {
                total_chars += typed.chars().count();
            }
            // target words never reached contribute nothing
            EitherOrBoth::Right(_) => {}
        }
    }

    let elapsed_minutes = now
        .duration_since(started_at)
        .map(|d| d.as_secs_f64() / 60.0)
        .unwrap_or(0.0);

    let wpm = if transcript.is_empty() || elapsed_minutes <= 0.0 {
        0
    } else {
        (correct_chars as f64 / 5.0 / elapsed_minutes).round() as u32
    };

    let accuracy = if total_chars == 0 {
        100
    } else {
        (correct_chars as f64 / total_chars as f64 * 100.0).round() as u32
    };

    Score { wpm, accuracy }
}
