use std::io::{self, Write};

use crossterm::{
    cursor::MoveUp,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::typing::TypingState;

/// Lines of text shown in the scrolling window.
pub const VISIBLE_LINES: usize = 3;
/// Columns reserved for the cursor bar.
const CURSOR_WIDTH: usize = 1;

/// One display line after word wrapping. `char_indices` maps each display
/// column back to its index in the source text.
#[derive(Debug, Default, Clone)]
pub struct WrappedLine {
    pub content: String,
    pub char_indices: Vec<usize>,
    pub has_cursor: bool,
    pub cursor_position: usize,
}

/// A fully composed frame: the bytes to emit and the number of terminal
/// lines they occupy.
pub struct Frame {
    pub bytes: Vec<u8>,
    pub line_count: usize,
}

/// Compose the next frame for the current state. Pure with respect to the
/// terminal: nothing is written here.
pub fn compose(state: &TypingState) -> io::Result<Frame> {
    let mut buf: Vec<u8> = Vec::new();

    clear_previous(&mut buf, state.last_line_count)?;

    if state.is_timed {
        countdown_line(&mut buf, state)?;
    }

    let line_width = state.terminal_width as usize - CURSOR_WIDTH;
    let lines = wrap_lines(&state.session_text, state.position, line_width);
    let (start, end) = visible_window(&lines);
    emit_lines(&mut buf, &lines[start..end], state)?;

    let mut line_count = end - start;
    if state.is_timed {
        line_count += 1;
    }

    Ok(Frame {
        bytes: buf,
        line_count,
    })
}

/// Compose and emit a frame in one buffered write, then remember how many
/// lines it covered so the next frame can clear it in place.
pub fn paint(state: &mut TypingState, out: &mut impl Write) -> io::Result<()> {
    let frame = compose(state)?;
    out.write_all(&frame.bytes)?;
    out.flush()?;
    state.last_line_count = frame.line_count;
    Ok(())
}

/// Return the cursor to the top-left of the previous frame's region.
fn clear_previous(buf: &mut Vec<u8>, last_line_count: usize) -> io::Result<()> {
    queue!(buf, Print("\r"))?;
    if last_line_count > 1 {
        queue!(buf, MoveUp((last_line_count - 1) as u16))?;
    }
    Ok(())
}

fn countdown_line(buf: &mut Vec<u8>, state: &TypingState) -> io::Result<()> {
    let remaining = state.remaining();
    let mut seconds = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        seconds += 1; // display counts down in whole seconds, rounding up
    }
    queue!(
        buf,
        SetForegroundColor(Color::Blue),
        Print(seconds),
        ResetColor,
        Clear(ClearType::UntilNewLine),
        Print("\r\n"),
    )
}

/// Split text into display lines, filling greedily at word boundaries.
/// Words never split across lines; a space that lands at a line break is
/// absorbed into it.
pub fn wrap_lines(text: &str, cursor: usize, line_width: usize) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut current = WrappedLine::default();
    let mut index = 0usize;

    for token in tokenize(text) {
        if !current.content.is_empty() && current.content.len() + token.len() > line_width {
            lines.push(std::mem::take(&mut current));
            if token == " " {
                index += 1;
                continue;
            }
        }
        for ch in token.chars() {
            if index == cursor {
                current.has_cursor = true;
                current.cursor_position = current.content.len();
            }
            current.content.push(ch);
            current.char_indices.push(index);
            index += 1;
        }
    }

    // past the end of the text the cursor rides the final line
    if cursor >= text.len() {
        current.has_cursor = true;
        current.cursor_position = current.content.len();
    }
    if !current.content.is_empty() || current.has_cursor {
        lines.push(current);
    }

    lines
}

/// Words and single spaces as separate tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start = None;

    for (i, byte) in text.bytes().enumerate() {
        if byte == b' ' {
            if let Some(start) = word_start.take() {
                tokens.push(&text[start..i]);
            }
            tokens.push(&text[i..=i]);
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        tokens.push(&text[start..]);
    }

    tokens
}

/// The window keeps one line of context above the cursor where possible
/// and never shows more than `VISIBLE_LINES` lines.
pub fn visible_window(lines: &[WrappedLine]) -> (usize, usize) {
    let cursor_line = lines.iter().position(|l| l.has_cursor).unwrap_or(0);

    let start = cursor_line.saturating_sub(1);
    let end = (start + VISIBLE_LINES).min(lines.len());
    let start = end.saturating_sub(VISIBLE_LINES);

    (start, end)
}

fn emit_lines(buf: &mut Vec<u8>, lines: &[WrappedLine], state: &TypingState) -> io::Result<()> {
    for (line_idx, line) in lines.iter().enumerate() {
        for (col, ch) in line.content.chars().enumerate() {
            if line.has_cursor && col == line.cursor_position {
                cursor_bar(buf)?;
            }

            let source = line.char_indices[col];
            if source < state.position {
                let color = if state.correctness[source] {
                    Color::Green
                } else {
                    Color::Red
                };
                queue!(buf, SetForegroundColor(color), Print(ch), ResetColor)?;
            } else {
                queue!(buf, Print(ch))?;
            }
        }

        if line.has_cursor && line.cursor_position >= line.content.len() {
            cursor_bar(buf)?;
        }

        queue!(buf, Clear(ClearType::UntilNewLine))?;
        if line_idx < lines.len() - 1 {
            queue!(buf, Print("\r\n"))?;
        }
    }
    Ok(())
}

fn cursor_bar(buf: &mut Vec<u8>) -> io::Result<()> {
    queue!(
        buf,
        SetForegroundColor(Color::Yellow),
        SetAttribute(Attribute::Bold),
        Print('|'),
        SetAttribute(Attribute::Reset),
    )
}
