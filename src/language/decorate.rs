use rand::seq::SliceRandom;
use rand::Rng;

/// Marks a generated word can be decorated with. Sentence-ending marks are
/// appended, quotes wrap the word, the hyphen attaches to either side.
const MARKS: [char; 9] = ['.', ',', '!', '?', ';', ':', '-', '\'', '"'];

/// Attach one randomly chosen punctuation mark to a word.
pub fn punctuate<R: Rng>(word: &str, rng: &mut R) -> String {
    let mark = *MARKS.choose(rng).unwrap();

    match mark {
        '.' | ',' | '!' | '?' | ';' | ':' => format!("{word}{mark}"),
        '\'' | '"' => format!("{mark}{word}{mark}"),
        '-' => {
            if rng.gen_bool(0.5) {
                format!("{word}-")
            } else {
                format!("-{word}")
            }
        }
        _ => word.to_string(),
    }
}

/// Prefix a word with a random number of at most two digits.
pub fn prefix_number<R: Rng>(word: &str, rng: &mut R) -> String {
    let number: u32 = rng.gen_range(0..100);
    format!("{number}{word}")
}
