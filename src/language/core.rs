use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static LANG_DIR: Dir = include_dir!("src/lang");

/// A fixed word corpus, embedded into the binary at build time.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Corpus {
    pub fn new(file_name: &str) -> Self {
        read_corpus_from_file(format!("{file_name}.json")).unwrap()
    }
}

fn read_corpus_from_file(file_name: String) -> Result<Corpus, Box<dyn Error>> {
    let file = LANG_DIR.get_file(file_name).expect("Corpus file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let corpus = from_str(file_as_str).expect("Unable to deserialize corpus json");

    Ok(corpus)
}
