use include_dir::{include_dir, Dir};
use rand::Rng;

use crate::config::{Config, TextSource};
use crate::error::Error;

static WORDS_DIR: Dir = include_dir!("src/words");

const WORD_FILE: &str = "common.txt";

/// Initial buffer sizes for timed mode, large enough that extension is
/// rarely needed within a normal session.
const TIMED_WORD_BUFFER: usize = 1000;
const TIMED_SENTENCE_BUFFER: usize = 100;
/// Words appended each time a timed session reaches the end of its buffer.
const EXTENSION_WORDS: usize = 100;

const PANGRAMS: [&str; 4] = [
    "The quick brown fox jumps over the lazy dog.",
    "Pack my box with five dozen liquor jugs.",
    "How vexingly quick daft zebras jump!",
    "Sphinx of black quartz, judge my vow.",
];

/// Materializes target text for sessions and on-demand extensions for
/// timed mode. Owns the embedded word list.
pub struct TextProvider {
    words: Vec<String>,
    config: Config,
}

impl TextProvider {
    pub fn new(config: Config) -> Result<Self, Error> {
        let words = load_words()?;
        Ok(Self { words, config })
    }

    /// Target text for one session.
    pub fn session_text(&self) -> String {
        match self.config.text_source {
            TextSource::Sentences if self.config.is_timed() => {
                self.pick_pangrams(TIMED_SENTENCE_BUFFER)
            }
            TextSource::Sentences => {
                let mut rng = rand::thread_rng();
                PANGRAMS[rng.gen_range(0..PANGRAMS.len())].to_string()
            }
            TextSource::Words if self.config.is_timed() => self.pick_words(TIMED_WORD_BUFFER),
            TextSource::Words => self.pick_words(self.config.word_count),
        }
    }

    /// Extra text for a timed session that has caught up with the end of
    /// its buffer: a separating space plus a fresh batch of words.
    pub fn extension(&self) -> String {
        let mut text = String::from(" ");
        text.push_str(&self.pick_words(EXTENSION_WORDS));
        text
    }

    fn pick_words(&self, count: usize) -> String {
        let mut rng = rand::thread_rng();
        let picked: Vec<&str> = (0..count)
            .map(|_| self.words[rng.gen_range(0..self.words.len())].as_str())
            .collect();
        picked.join(" ")
    }

    fn pick_pangrams(&self, count: usize) -> String {
        let mut rng = rand::thread_rng();
        let picked: Vec<&str> = (0..count)
            .map(|_| PANGRAMS[rng.gen_range(0..PANGRAMS.len())])
            .collect();
        picked.join(" ")
    }
}

fn load_words() -> Result<Vec<String>, Error> {
    let file = WORDS_DIR.get_file(WORD_FILE).ok_or(Error::SourceEmpty)?;
    let data = file.contents_utf8().ok_or(Error::SourceEmpty)?;
    parse_words(data)
}

/// One token per line; surrounding whitespace and blank lines ignored.
fn parse_words(data: &str) -> Result<Vec<String>, Error> {
    let words: Vec<String> = data
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        return Err(Error::SourceEmpty);
    }
    Ok(words)
}
