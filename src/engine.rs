use crate::config::{TestConfig, TestMode, TIMED_PASSAGE_WORDS};
use crate::generator::TextGenerator;
use crate::language::Corpus;
use crate::scoring::{score, ResultRecord};
use crate::transcript::{Transcript, WINDOW_AHEAD};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Complete,
}

/// The typing-test engine: owns the passage, the transcript and the run
/// state, and is mutated only through the transitions below. The timer
/// callback and the input handler both read this single source of truth.
#[derive(Debug)]
pub struct Engine {
    config: TestConfig,
    generator: TextGenerator,
    passage: Vec<String>,
    transcript: Transcript,
    phase: Phase,
    started_at: Option<SystemTime>,
    seconds_remaining: Option<u32>,
    result: Option<ResultRecord>,
    epoch: u64,
}

impl Engine {
    pub fn new(config: TestConfig) -> Self {
        let generator = TextGenerator::new(
            Corpus::new("english"),
            config.punctuation,
            config.numbers,
        );
        let passage = generator.generate(config.passage_word_count());
        Self::from_parts(config, generator, passage)
    }

    /// Build an engine over a caller-supplied passage. The fixture entry
    /// point for headless tests; `new` is the production path.
    pub fn with_passage(config: TestConfig, passage: Vec<String>) -> Self {
        let generator = TextGenerator::new(
            Corpus::new("english"),
            config.punctuation,
            config.numbers,
        );
        Self::from_parts(config, generator, passage)
    }

    fn from_parts(config: TestConfig, generator: TextGenerator, passage: Vec<String>) -> Self {
        Self {
            config,
            generator,
            passage,
            transcript: Transcript::new(),
            phase: Phase::Idle,
            started_at: None,
            seconds_remaining: None,
            result: None,
            epoch: 0,
        }
    }

    /// Feed one typed character into the word buffer.
    pub fn type_char(&mut self, c: char) {
        let mut buffer = self.transcript.partial().to_string();
        buffer.push(c);
        self.apply_input(&buffer);
    }

    /// Drop the last character of the word buffer. Completed words cannot be
    /// uncommitted.
    pub fn backspace(&mut self) {
        if self.transcript.partial().is_empty() {
            return;
        }
        let mut buffer = self.transcript.partial().to_string();
        buffer.pop();
        self.apply_input(&buffer);
    }

    /// Consume an input-changed event carrying the full word-buffer value.
    /// The first non-empty input after a reset starts the run; input after
    /// completion is discarded.
    pub fn apply_input(&mut self, value: &str) {
        match self.phase {
            Phase::Complete => return,
            Phase::Idle if !value.is_empty() => self.start(),
            _ => {}
        }

        if self.phase != Phase::Running {
            return;
        }

        let committed = self.transcript.apply_input(value);
        if !committed {
            return;
        }

        match self.config.mode() {
            TestMode::Words => {
                if self.transcript.completed().len() >= self.config.limit() as usize {
                    self.finish();
                }
            }
            TestMode::Time => self.extend_passage_if_low(),
        }
    }

    /// Consume one countdown tick. Ticks stamped with a stale epoch (spawned
    /// for a run that has since been reset) are discarded, as are ticks
    /// arriving outside a timed Running phase. Returns whether the tick was
    /// consumed.
    pub fn on_tick(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || self.phase != Phase::Running {
            return false;
        }
        let Some(remaining) = self.seconds_remaining else {
            return false;
        };

        let remaining = remaining.saturating_sub(1);
        self.seconds_remaining = Some(remaining);
        if remaining == 0 {
            self.finish();
        }
        true
    }

    fn start(&mut self) {
        self.phase = Phase::Running;
        self.started_at = Some(SystemTime::now());
        if self.config.mode() == TestMode::Time {
            self.seconds_remaining = Some(self.config.limit());
        }
    }

    /// Transition to Complete and produce the result record. Idempotent: a
    /// duplicate trigger (timer tick racing a word-count completion) finds
    /// the phase already terminal and does nothing.
    fn finish(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        let started_at = self
            .started_at
            .expect("a running test has a start timestamp");
        let metrics = score(
            &self.transcript.final_words(),
            &self.passage,
            started_at,
            SystemTime::now(),
        );

        let mode = self.config.mode();
        self.result = Some(ResultRecord {
            wpm: metrics.wpm,
            accuracy: metrics.accuracy,
            test_type: mode,
            test_option: self.config.limit(),
            duration_secs: (mode == TestMode::Time).then_some(self.config.limit()),
            word_count: (mode == TestMode::Words).then_some(self.config.limit()),
        });
        self.phase = Phase::Complete;
        self.seconds_remaining = None;
    }

    /// Return to Idle with a fresh passage and an empty transcript. Bumps
    /// the epoch so ticks spawned for the old run can no longer touch this
    /// one.
    pub fn reset(&mut self) {
        self.passage = self.generator.generate(self.config.passage_word_count());
        self.transcript.clear();
        self.phase = Phase::Idle;
        self.started_at = None;
        self.seconds_remaining = None;
        self.result = None;
        self.epoch += 1;
    }

    /// Timed runs never exhaust their text: once the untyped tail shrinks
    /// below the render lookahead, another batch is appended.
    fn extend_passage_if_low(&mut self) {
        let ahead = self
            .passage
            .len()
            .saturating_sub(self.transcript.current_word_index());
        if ahead < WINDOW_AHEAD {
            self.passage.extend(self.generator.generate(TIMED_PASSAGE_WORDS));
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn passage(&self) -> &[String] {
        &self.passage
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.seconds_remaining
    }

    pub fn result(&self) -> Option<&ResultRecord> {
        self.result.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use assert_matches::assert_matches;

    fn timed_config(secs: u32) -> TestConfig {
        TestConfig::new(TestMode::Time, secs, false, false).unwrap()
    }

    fn words_config(count: u32) -> TestConfig {
        TestConfig::new(TestMode::Words, count, false, false).unwrap()
    }

    fn type_word(engine: &mut Engine, word: &str) {
        for c in word.chars() {
            engine.type_char(c);
        }
        engine.type_char(' ');
    }

    #[test]
    fn test_new_engine_is_idle_with_a_full_passage() {
        let engine = Engine::new(words_config(50));

        assert_matches!(engine.phase(), Phase::Idle);
        assert_eq!(engine.passage().len(), 50);
        assert!(engine.result().is_none());
        assert!(engine.seconds_remaining().is_none());
    }

    #[test]
    fn test_first_input_starts_the_run() {
        let mut engine = Engine::new(timed_config(15));

        engine.type_char('t');

        assert_matches!(engine.phase(), Phase::Running);
        assert_eq!(engine.seconds_remaining(), Some(15));
    }

    #[test]
    fn test_words_mode_has_no_countdown() {
        let mut engine = Engine::new(words_config(50));

        engine.type_char('t');

        assert_matches!(engine.phase(), Phase::Running);
        assert!(engine.seconds_remaining().is_none());
        assert!(!engine.on_tick(engine.epoch()));
    }

    #[test]
    fn test_backspace_on_empty_buffer_does_not_start_the_run() {
        let mut engine = Engine::new(words_config(50));

        engine.backspace();

        assert_matches!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_words_mode_completes_exactly_once_at_the_limit() {
        let passage: Vec<String> = (0..50).map(|_| "the".to_string()).collect();
        let mut engine = Engine::with_passage(words_config(50), passage);

        for _ in 0..49 {
            type_word(&mut engine, "the");
        }
        assert_matches!(engine.phase(), Phase::Running);

        type_word(&mut engine, "the");
        assert_matches!(engine.phase(), Phase::Complete);

        let first = engine.result().cloned().expect("result produced");
        assert_eq!(first.test_type, TestMode::Words);
        assert_eq!(first.test_option, 50);
        assert_eq!(first.word_count, Some(50));
        assert_eq!(first.duration_secs, None);

        // a trailing word typed before the caller notices completion
        type_word(&mut engine, "the");
        assert_eq!(engine.result(), Some(&first));
        assert_eq!(engine.transcript().completed().len(), 50);
    }

    #[test]
    fn test_timer_completes_exactly_once() {
        let mut engine = Engine::new(timed_config(15));
        engine.type_char('t');
        let epoch = engine.epoch();

        for _ in 0..14 {
            assert!(engine.on_tick(epoch));
        }
        assert_matches!(engine.phase(), Phase::Running);
        assert_eq!(engine.seconds_remaining(), Some(1));

        assert!(engine.on_tick(epoch));
        assert_matches!(engine.phase(), Phase::Complete);
        let first = engine.result().cloned().expect("result produced");
        assert_eq!(first.test_type, TestMode::Time);
        assert_eq!(first.duration_secs, Some(15));
        assert_eq!(first.word_count, None);

        // a 16th queued tick must neither re-fire completion nor re-score
        assert!(!engine.on_tick(epoch));
        assert_eq!(engine.result(), Some(&first));
    }

    #[test]
    fn test_ticks_before_the_run_starts_are_ignored() {
        let mut engine = Engine::new(timed_config(15));

        assert!(!engine.on_tick(engine.epoch()));
        assert_matches!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_stale_epoch_ticks_are_discarded_after_reset() {
        let mut engine = Engine::new(timed_config(15));
        engine.type_char('t');
        let stale = engine.epoch();

        engine.reset();
        engine.type_char('t');

        assert!(!engine.on_tick(stale));
        assert_eq!(engine.seconds_remaining(), Some(15));

        assert!(engine.on_tick(engine.epoch()));
        assert_eq!(engine.seconds_remaining(), Some(14));
    }

    #[test]
    fn test_input_after_completion_is_discarded() {
        let mut engine = Engine::new(timed_config(15));
        engine.type_char('t');
        let epoch = engine.epoch();
        for _ in 0..15 {
            engine.on_tick(epoch);
        }
        assert_matches!(engine.phase(), Phase::Complete);

        let typed_before = engine.transcript().partial().to_string();
        engine.type_char('x');
        engine.backspace();

        assert_eq!(engine.transcript().partial(), typed_before);
        assert_matches!(engine.phase(), Phase::Complete);
    }

    #[test]
    fn test_reset_returns_to_idle_from_any_phase() {
        let mut engine = Engine::new(timed_config(15));

        // from Idle
        engine.reset();
        assert_matches!(engine.phase(), Phase::Idle);

        // from Running
        engine.type_char('t');
        engine.reset();
        assert_matches!(engine.phase(), Phase::Idle);
        assert!(engine.result().is_none());
        assert!(engine.seconds_remaining().is_none());
        assert_eq!(engine.transcript().completed().len(), 0);

        // from Complete
        engine.type_char('t');
        let epoch = engine.epoch();
        for _ in 0..15 {
            engine.on_tick(epoch);
        }
        assert_matches!(engine.phase(), Phase::Complete);
        engine.reset();
        assert_matches!(engine.phase(), Phase::Idle);
        assert!(engine.result().is_none());

        // and the next run starts cleanly
        engine.type_char('t');
        assert_matches!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_reset_regenerates_the_passage() {
        let mut engine = Engine::new(words_config(50));
        engine.reset();

        assert_eq!(engine.passage().len(), 50);
    }

    #[test]
    fn test_timed_run_extends_passage_before_exhaustion() {
        let mut engine = Engine::new(timed_config(120));
        assert_eq!(engine.passage().len(), TIMED_PASSAGE_WORDS);

        // commit enough words to cross into the render lookahead
        for _ in 0..(TIMED_PASSAGE_WORDS - WINDOW_AHEAD + 1) {
            type_word(&mut engine, "x");
        }

        assert!(engine.passage().len() > TIMED_PASSAGE_WORDS);
        assert_matches!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_words_mode_never_extends_the_passage() {
        let passage: Vec<String> = (0..50).map(|_| "x".to_string()).collect();
        let mut engine = Engine::with_passage(words_config(50), passage);

        for _ in 0..49 {
            type_word(&mut engine, "x");
        }

        assert_eq!(engine.passage().len(), 50);
    }

    #[test]
    fn test_result_reflects_the_transcript() {
        let passage: Vec<String> = (0..50).map(|_| "ab".to_string()).collect();
        let mut engine = Engine::with_passage(words_config(50), passage);

        for _ in 0..50 {
            type_word(&mut engine, "ab");
        }

        let result = engine.result().expect("run completed");
        // every typed character matched its target
        assert_eq!(result.accuracy, 100);
    }
}
