use std::time::{Duration, Instant};

use crate::config::Config;

/// In-memory model of one typing session.
///
/// Two counter pairs track accuracy: the corrected pair (`chars_typed`,
/// `errors`) moves backwards on backspace, while the raw pair
/// (`raw_keystrokes`, `raw_errors`) only ever grows. Slots the user skips
/// past with a mid-word space count against raw accuracy only.
#[derive(Debug)]
pub struct TypingState {
    pub session_text: String,
    pub position: usize,
    /// Per-character correctness, meaningful below `position`.
    pub correctness: Vec<bool>,
    /// Whether the slot was actually typed rather than filled by a skip.
    pub typed: Vec<bool>,
    pub chars_typed: usize,
    pub errors: usize,
    pub raw_keystrokes: usize,
    pub raw_errors: usize,
    pub backspace_count: usize,
    /// Set when the scheduler enters the session, not at construction, so
    /// the countdown starts with the first displayed frame.
    pub started_at: Option<Instant>,
    pub time_limit: Duration,
    pub is_timed: bool,
    /// Lines painted by the previous frame, for the in-place clear.
    pub last_line_count: usize,
    pub terminal_width: u16,
}

impl TypingState {
    pub fn new(target: String, config: &Config, terminal_width: u16) -> Self {
        let len = target.len();
        Self {
            session_text: target,
            position: 0,
            correctness: vec![false; len],
            typed: vec![false; len],
            chars_typed: 0,
            errors: 0,
            raw_keystrokes: 0,
            raw_errors: 0,
            backspace_count: 0,
            started_at: None,
            time_limit: config.time_limit(),
            is_timed: config.is_timed(),
            last_line_count: 0,
            terminal_width,
        }
    }

    /// Start the clock.
    pub fn begin(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.session_text.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn remaining(&self) -> Duration {
        self.time_limit.saturating_sub(self.elapsed())
    }

    pub fn correct_chars(&self) -> usize {
        self.correctness[..self.position]
            .iter()
            .filter(|&&correct| correct)
            .count()
    }

    /// A printable, non-space keystroke. Past the end of the text it does
    /// nothing at all.
    pub fn type_char(&mut self, byte: u8) {
        if self.at_end() {
            return;
        }
        self.chars_typed += 1;
        self.raw_keystrokes += 1;

        let correct = self.session_text.as_bytes()[self.position] == byte;
        self.typed[self.position] = true;
        self.correctness[self.position] = correct;
        if !correct {
            self.errors += 1;
            self.raw_errors += 1;
        }
        self.position += 1;
    }

    /// Space advances over a matching space, or abandons the rest of the
    /// current word. Either way the keystroke itself is counted.
    pub fn type_space(&mut self) {
        self.chars_typed += 1;
        self.raw_keystrokes += 1;

        if !self.at_end() && self.session_text.as_bytes()[self.position] == b' ' {
            self.typed[self.position] = true;
            self.correctness[self.position] = true;
            self.position += 1;
        } else if self.mid_word() {
            self.skip_to_next_word();
        }
        // Space at the start of a word: no advance, keystroke still counted.
    }

    fn mid_word(&self) -> bool {
        self.position > 0 && self.session_text.as_bytes()[self.position - 1] != b' '
    }

    /// Abandoned slots count against raw accuracy only; the space that
    /// terminates the word is consumed by the keystroke that skipped.
    fn skip_to_next_word(&mut self) {
        let bytes = self.session_text.as_bytes();
        let mut next_space = self.position;
        while next_space < bytes.len() && bytes[next_space] != b' ' {
            next_space += 1;
        }

        for slot in self.position..next_space {
            self.correctness[slot] = false;
            self.typed[slot] = false;
            self.raw_errors += 1;
        }

        if next_space < bytes.len() {
            self.typed[next_space] = true;
            self.correctness[next_space] = true;
            self.position = next_space + 1;
        } else {
            self.position = next_space;
        }
    }

    /// Step back one slot. Raw counters never move; `errors` only unwinds
    /// for a slot that was actually typed wrong. The slot is cleared so
    /// the next keystroke evaluates it fresh.
    pub fn backspace(&mut self) {
        if self.position == 0 {
            return;
        }
        self.position -= 1;
        self.chars_typed = self.chars_typed.saturating_sub(1);
        self.backspace_count += 1;

        if self.typed[self.position] && !self.correctness[self.position] {
            self.errors -= 1;
        }
        self.typed[self.position] = false;
        self.correctness[self.position] = false;
    }

    /// Grow the target text in place (timed mode). Existing entries keep
    /// their values; new slots start untouched.
    pub fn extend_with(&mut self, text: &str) {
        self.session_text.push_str(text);
        self.correctness.resize(self.session_text.len(), false);
        self.typed.resize(self.session_text.len(), false);
    }
}
