use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::typing::TypingState;

/// One typed word is five characters, the standard WPM convention.
const CHARS_PER_WORD: f64 = 5.0;

/// Final statistics frozen from a completed (or aborted) session.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub wpm: f64,
    pub duration: Duration,
    /// Accuracy after backspace corrections.
    pub accuracy: f64,
    /// Accuracy over every keystroke ever pressed.
    pub raw_accuracy: f64,
    pub correct_chars: usize,
    pub errors: usize,
    pub raw_errors: usize,
    pub backspaces: usize,
}

impl Results {
    pub fn from_state(state: &TypingState) -> Self {
        let duration = state.elapsed();
        let correct_chars = state.correct_chars();

        Self {
            wpm: wpm(correct_chars, duration),
            duration,
            accuracy: accuracy(state.chars_typed, state.errors),
            raw_accuracy: accuracy(state.raw_keystrokes, state.raw_errors),
            correct_chars,
            errors: state.errors,
            raw_errors: state.raw_errors,
            backspaces: state.backspace_count,
        }
    }

    /// Print with explicit carriage returns; the terminal is still raw.
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            Print("\r\n"),
            SetForegroundColor(Color::Blue),
            Print("Results:"),
            ResetColor,
            Print("\r\n"),
        )?;
        queue!(out, Print(format!("WPM:          {:.1}\r\n", self.wpm)))?;
        queue!(
            out,
            Print(format!("Duration:     {}s\r\n", self.duration.as_secs()))
        )?;
        queue!(
            out,
            Print(format!("Accuracy:     {:.1}%\r\n", self.accuracy))
        )?;
        queue!(out, Print(format!("Errors:       {}\r\n", self.errors)))?;
        queue!(
            out,
            Print(format!("Raw Accuracy: {:.1}%\r\n", self.raw_accuracy))
        )?;
        queue!(
            out,
            Print(format!("Raw Errors:   {}\r\n", self.raw_errors))
        )?;
        queue!(
            out,
            Print(format!("Backspaces:   {}\r\n", self.backspaces))
        )?;
        out.flush()
    }
}

/// Percentage of keystrokes that were correct, clamped to [0, 100].
fn accuracy(keystrokes: usize, errors: usize) -> f64 {
    if keystrokes == 0 {
        return 0.0;
    }
    let pct = (keystrokes as f64 - errors as f64) / keystrokes as f64 * 100.0;
    pct.clamp(0.0, 100.0)
}

/// Words per minute over correctly typed characters only.
fn wpm(correct_chars: usize, duration: Duration) -> f64 {
    let minutes = duration.as_secs_f64() / 60.0;
    if correct_chars == 0 || minutes == 0.0 {
        return 0.0;
    }
    correct_chars as f64 / CHARS_PER_WORD / minutes
}
