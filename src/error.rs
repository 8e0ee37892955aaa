use std::io;

use thiserror::Error;

use crate::terminal::MIN_WIDTH;

/// Fatal engine errors. All of these abort before or between sessions; the
/// terminal guard has already restored the screen by the time any of them
/// reaches stderr.
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal too narrow: {width} columns (minimum {} columns required)", MIN_WIDTH)]
    TerminalTooNarrow { width: u16 },

    #[error("failed to acquire terminal: {0}")]
    TerminalAcquire(#[source] io::Error),

    #[error("no words found in embedded word list")]
    SourceEmpty,

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
