use std::ops::Range;

/// Live correctness of one character in the active word, for rendering only.
/// Scoring recomputes correctness from the full transcript independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharOutcome {
    Correct,
    Incorrect,
    Pending,
}

/// How many completed words stay visible behind the active word.
const WINDOW_BEHIND: usize = 5;
/// How many upcoming words are visible ahead of the active word.
pub const WINDOW_AHEAD: usize = 30;

/// Word-by-word record of what the user actually typed.
///
/// Completed words are append-only; the in-progress partial word is replaced
/// wholesale on every input event. `completed.len()` is the current word
/// index by construction.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    completed: Vec<String>,
    partial: String,
    char_cursor: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one input-changed event carrying the full value of the word
    /// buffer. Returns true when the event committed a word boundary.
    ///
    /// A trailing space commits the trimmed buffer as exactly one completed
    /// word and clears the partial; any other value replaces the partial
    /// verbatim. Total over every string, including empty and
    /// whitespace-only buffers.
    pub fn apply_input(&mut self, value: &str) -> bool {
        if value.ends_with(' ') {
            self.completed.push(value.trim().to_string());
            self.partial.clear();
            self.char_cursor = 0;
            true
        } else {
            self.partial = value.to_string();
            self.char_cursor = self.partial.chars().count();
            false
        }
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn current_word_index(&self) -> usize {
        self.completed.len()
    }

    pub fn partial(&self) -> &str {
        &self.partial
    }

    pub fn char_cursor(&self) -> usize {
        self.char_cursor
    }

    /// The transcript as scored: completed words plus the trimmed in-flight
    /// partial appended as the final entry, even when empty.
    pub fn final_words(&self) -> Vec<String> {
        let mut words = self.completed.clone();
        words.push(self.partial.trim().to_string());
        words
    }

    /// Window of passage indices worth rendering around the active word.
    pub fn visible_window(&self, total_words: usize) -> Range<usize> {
        let index = self.current_word_index();
        let start = index.saturating_sub(WINDOW_BEHIND);
        let end = (index + WINDOW_AHEAD).min(total_words);
        start..end
    }

    /// Per-character outcomes of the active word against its target, one
    /// entry per target character. Only the already-typed prefix is judged.
    pub fn active_outcomes(&self, target: &str) -> Vec<CharOutcome> {
        let typed: Vec<char> = self.partial.chars().collect();

        target
            .chars()
            .enumerate()
            .map(|(idx, expected)| {
                if idx < self.char_cursor {
                    if typed.get(idx) == Some(&expected) {
                        CharOutcome::Correct
                    } else {
                        CharOutcome::Incorrect
                    }
                } else {
                    CharOutcome::Pending
                }
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
        self.partial.clear();
        self.char_cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_space_commits_exactly_one_word() {
        let mut transcript = Transcript::new();

        assert!(!transcript.apply_input("the"));
        assert_eq!(transcript.completed().len(), 0);

        assert!(transcript.apply_input("the "));
        assert_eq!(transcript.completed(), ["the"]);
        assert_eq!(transcript.current_word_index(), 1);
        assert_eq!(transcript.partial(), "");
        assert_eq!(transcript.char_cursor(), 0);
    }

    #[test]
    fn test_partial_is_replaced_verbatim() {
        let mut transcript = Transcript::new();

        transcript.apply_input("t");
        transcript.apply_input("te");
        transcript.apply_input("teh");
        assert_eq!(transcript.partial(), "teh");
        assert_eq!(transcript.char_cursor(), 3);

        // backspace arrives as a shorter buffer
        transcript.apply_input("te");
        assert_eq!(transcript.partial(), "te");
        assert_eq!(transcript.char_cursor(), 2);
    }

    #[test]
    fn test_whitespace_only_buffer_commits_an_empty_word() {
        let mut transcript = Transcript::new();

        assert!(transcript.apply_input(" "));
        assert_eq!(transcript.completed(), [""]);
        assert_eq!(transcript.current_word_index(), 1);
    }

    #[test]
    fn test_empty_buffer_is_a_no_op_replacement() {
        let mut transcript = Transcript::new();

        assert!(!transcript.apply_input(""));
        assert_eq!(transcript.partial(), "");
        assert_eq!(transcript.char_cursor(), 0);
        assert_eq!(transcript.completed().len(), 0);
    }

    #[test]
    fn test_word_index_always_equals_completed_count() {
        let mut transcript = Transcript::new();

        for word in ["the ", "be ", "to "] {
            transcript.apply_input(word);
            assert_eq!(transcript.current_word_index(), transcript.completed().len());
        }
    }

    #[test]
    fn test_final_words_appends_trimmed_partial() {
        let mut transcript = Transcript::new();
        transcript.apply_input("the ");
        transcript.apply_input("be");

        assert_eq!(transcript.final_words(), ["the", "be"]);

        // the final entry is appended even when untyped
        let mut untouched = Transcript::new();
        untouched.apply_input("the ");
        assert_eq!(untouched.final_words(), ["the", ""]);
    }

    #[test]
    fn test_visible_window_clamps_both_ends() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.visible_window(300), 0..30);
        assert_eq!(transcript.visible_window(10), 0..10);

        for _ in 0..8 {
            transcript.apply_input("x ");
        }
        assert_eq!(transcript.visible_window(300), 3..38);
        assert_eq!(transcript.visible_window(20), 3..20);
    }

    #[test]
    fn test_active_outcomes_judges_only_the_typed_prefix() {
        let mut transcript = Transcript::new();
        transcript.apply_input("teh");

        assert_eq!(
            transcript.active_outcomes("the"),
            [
                CharOutcome::Correct,
                CharOutcome::Incorrect,
                CharOutcome::Incorrect,
            ]
        );

        transcript.apply_input("t");
        assert_eq!(
            transcript.active_outcomes("the"),
            [
                CharOutcome::Correct,
                CharOutcome::Pending,
                CharOutcome::Pending,
            ]
        );
    }

    #[test]
    fn test_active_outcomes_ignores_overflow_chars() {
        let mut transcript = Transcript::new();
        transcript.apply_input("there");

        // one entry per target character, overflow is not rendered
        assert_eq!(transcript.active_outcomes("the").len(), 3);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut transcript = Transcript::new();
        transcript.apply_input("the ");
        transcript.apply_input("be");

        transcript.clear();
        assert_eq!(transcript.completed().len(), 0);
        assert_eq!(transcript.partial(), "");
        assert_eq!(transcript.char_cursor(), 0);
    }
}
