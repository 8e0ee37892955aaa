use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    },
};

use crate::error::Error;

pub const MIN_WIDTH: u16 = 25;
pub const MAX_WIDTH: u16 = 80;

/// Exclusive ownership of the terminal for the program's lifetime. The
/// alternate screen keeps the user's scrollback intact; dropping the guard
/// restores cooked mode on every exit path, panics included.
pub struct RawTerminal;

impl RawTerminal {
    pub fn acquire() -> Result<Self, Error> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).map_err(Error::TerminalAcquire)?;

        if let Err(err) = enable_raw_mode() {
            // back out of the alternate screen before surfacing the failure
            let _ = execute!(stdout, Show, LeaveAlternateScreen);
            return Err(Error::TerminalAcquire(err));
        }

        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = disable_raw_mode();
        let _ = execute!(stdout, Show, LeaveAlternateScreen);
        let _ = stdout.write_all(b"\r\n");
        let _ = stdout.flush();
    }
}

/// Current terminal width clamped to the supported display range.
pub fn validated_width() -> Result<u16, Error> {
    let (width, _) = terminal::size()?;
    if width < MIN_WIDTH {
        return Err(Error::TerminalTooNarrow { width });
    }
    Ok(width.min(MAX_WIDTH))
}
