use std::time::Duration;

use clap::ValueEnum;

use crate::error::Error;

pub const DEFAULT_WORD_COUNT: usize = 50;
pub const DEFAULT_TIME_SECONDS: u64 = 30;

/// Where practice text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextSource {
    /// Random common words
    Words,
    /// Pangram sentences
    Sentences,
}

/// Resolved runtime configuration. Built once from the CLI before the
/// engine starts; nothing reads flags after this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub text_source: TextSource,
    /// Number of words to generate; only consulted when untimed.
    pub word_count: usize,
    /// Session length in seconds; zero means word-count mode.
    pub time_seconds: u64,
}

impl Config {
    /// Resolve the mode from the raw flag values. Timed wins when both are
    /// given; without either flag the default is a 30 second timed session.
    pub fn resolve(
        source: TextSource,
        time: Option<u64>,
        words: Option<usize>,
    ) -> Result<Self, Error> {
        if time == Some(0) {
            return Err(Error::ConfigInvalid(
                "--time must be greater than zero".into(),
            ));
        }
        if words == Some(0) {
            return Err(Error::ConfigInvalid(
                "--words must be greater than zero".into(),
            ));
        }

        let mut config = Config {
            text_source: source,
            word_count: DEFAULT_WORD_COUNT,
            time_seconds: DEFAULT_TIME_SECONDS,
        };

        match (time, words) {
            (Some(secs), _) => config.time_seconds = secs,
            (None, Some(count)) => {
                config.word_count = count;
                config.time_seconds = 0;
            }
            (None, None) => {}
        }

        Ok(config)
    }

    pub fn is_timed(&self) -> bool {
        self.time_seconds > 0
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_seconds)
    }
}
