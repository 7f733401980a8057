use crate::language::{decorate, Corpus};
use rand::seq::SliceRandom;
use rand::Rng;

/// Probability that a drawn word receives each decoration, applied
/// independently per word.
const DECORATION_CHANCE: f64 = 0.3;

/// Produces the target passage for a test run: words drawn uniformly with
/// replacement from a fixed corpus, optionally decorated with punctuation
/// and number prefixes.
#[derive(Debug)]
pub struct TextGenerator {
    corpus: Corpus,
    punctuation: bool,
    numbers: bool,
}

impl TextGenerator {
    pub fn new(corpus: Corpus, punctuation: bool, numbers: bool) -> Self {
        Self {
            corpus,
            punctuation,
            numbers,
        }
    }

    /// Materialize a passage of exactly `count` words.
    pub fn generate(&self, count: usize) -> Vec<String> {
        assert!(count > 0, "passage word count must be positive");
        let mut rng = rand::thread_rng();
        self.generate_with(count, &mut rng)
    }

    fn generate_with<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<String> {
        let mut words = Vec::with_capacity(count);

        for _ in 0..count {
            let mut word = self
                .corpus
                .words
                .choose(rng)
                .expect("word corpus is empty")
                .clone();

            if self.punctuation && rng.gen_bool(DECORATION_CHANCE) {
                word = decorate::punctuate(&word, rng);
            }

            // Number goes in front of any punctuation already applied, so a
            // quoted word reads like 12"word".
            if self.numbers && rng.gen_bool(DECORATION_CHANCE) {
                word = decorate::prefix_number(&word, rng);
            }

            words.push(word);
        }

        words
    }
}
