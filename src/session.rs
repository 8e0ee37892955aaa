use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::config::Config;
use crate::error::Error;
use crate::render;
use crate::runtime::KeySource;
use crate::stats::Results;
use crate::text::TextProvider;
use crate::typing::TypingState;

// Control bytes the session loop reacts to. Raw mode delivers Ctrl-C as a
// plain byte instead of a signal.
const CTRL_C: u8 = 3;
const BACKSPACE: u8 = 8;
const ENTER: u8 = 10;
const RETURN: u8 = 13;
const ESCAPE: u8 = 27;
const SPACE: u8 = 32;
const DELETE: u8 = 127;

/// Escape sequences (arrows, function keys) are at most a few bytes; the
/// tail is swallowed within this window.
const ESCAPE_DRAIN_WINDOW: Duration = Duration::from_millis(10);
const ESCAPE_DRAIN_MAX: usize = 10;
/// Keypresses that overshoot the end of a session are discarded before
/// the prompt is shown.
const PROMPT_DRAIN: Duration = Duration::from_millis(500);
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// How a single typing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Completed the text, or the clock ran out.
    Next,
    /// Ctrl-C during typing.
    Interrupt,
}

/// Answer to the post-session prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Next,
    Retry,
    Exit,
}

enum Wait {
    Key(u8),
    TimeUp,
    Closed,
}

/// Outer loop: generate target text, run attempts against it until the
/// user asks for new text or quits.
pub fn run<K: KeySource>(
    config: &Config,
    provider: &TextProvider,
    keys: &K,
    width: u16,
) -> Result<(), Error> {
    loop {
        let target = provider.session_text();
        if !attempts_for_target(&target, config, provider, keys, width)? {
            return Ok(());
        }
    }
}

/// Attempts against one target text. Returns true when the user wants a
/// fresh target, false to exit.
fn attempts_for_target<K: KeySource>(
    target: &str,
    config: &Config,
    provider: &TextProvider,
    keys: &K,
    width: u16,
) -> Result<bool, Error> {
    loop {
        let state = Arc::new(Mutex::new(TypingState::new(
            target.to_string(),
            config,
            width,
        )));

        if run_typing_session(&state, provider, keys)? == SessionEnd::Interrupt {
            return Ok(false);
        }

        match prompt_action(keys) {
            PromptAction::Exit => return Ok(false),
            PromptAction::Next => return Ok(true),
            PromptAction::Retry => {}
        }
    }
}

/// The session event loop. Multiplexes keystrokes against the absolute
/// deadline; every state mutation and paint happens under the one mutex
/// shared with the countdown repaint thread.
pub fn run_typing_session<K: KeySource>(
    state: &Arc<Mutex<TypingState>>,
    provider: &TextProvider,
    keys: &K,
) -> Result<SessionEnd, Error> {
    let mut stdout = io::stdout();
    session_header(&mut stdout)?;

    let stop = Arc::new(AtomicBool::new(false));
    let deadline;
    let is_timed;
    {
        let mut session = state.lock().unwrap();
        session.begin();
        is_timed = session.is_timed;
        deadline = session
            .started_at
            .filter(|_| is_timed)
            .map(|started| started + session.time_limit);
        render::paint(&mut session, &mut stdout)?;
    }

    // keeps the countdown fresh while the user idles; never ends the session
    let _countdown = is_timed.then(|| spawn_countdown(Arc::clone(state), Arc::clone(&stop)));

    loop {
        {
            let mut session = state.lock().unwrap();
            if session.at_end() {
                if session.is_timed {
                    // grow the buffer before the cursor can fall off the end
                    session.extend_with(&provider.extension());
                } else {
                    return finish(&mut session, &stop, &mut stdout, SessionEnd::Next);
                }
            }
        }

        let key = match next_key(keys, deadline) {
            Wait::Key(key) => key,
            Wait::TimeUp => {
                let mut session = state.lock().unwrap();
                return finish(&mut session, &stop, &mut stdout, SessionEnd::Next);
            }
            Wait::Closed => {
                // stdin went away mid-session: same exit as an interrupt
                let mut session = state.lock().unwrap();
                return finish(&mut session, &stop, &mut stdout, SessionEnd::Interrupt);
            }
        };

        match key {
            CTRL_C => {
                let mut session = state.lock().unwrap();
                return finish(&mut session, &stop, &mut stdout, SessionEnd::Interrupt);
            }
            ESCAPE => drain_escape_sequence(keys),
            BACKSPACE | DELETE => {
                let mut session = state.lock().unwrap();
                session.backspace();
                render::paint(&mut session, &mut stdout)?;
            }
            ENTER | RETURN => {}
            SPACE => {
                let mut session = state.lock().unwrap();
                session.type_space();
                render::paint(&mut session, &mut stdout)?;
            }
            key if key.is_ascii_graphic() => {
                let mut session = state.lock().unwrap();
                session.type_char(key);
                render::paint(&mut session, &mut stdout)?;
            }
            _ => {}
        }
    }
}

/// Wait for the next keystroke, bounded by the session deadline in timed
/// mode. The deadline is absolute: a keystroke burst cannot extend it.
fn next_key<K: KeySource>(keys: &K, deadline: Option<Instant>) -> Wait {
    match deadline {
        Some(deadline) => {
            let now = Instant::now();
            if now >= deadline {
                return Wait::TimeUp;
            }
            match keys.recv_timeout(deadline - now) {
                Ok(key) => Wait::Key(key),
                Err(RecvTimeoutError::Timeout) => Wait::TimeUp,
                Err(RecvTimeoutError::Disconnected) => Wait::Closed,
            }
        }
        None => match keys.recv() {
            Ok(key) => Wait::Key(key),
            Err(_) => Wait::Closed,
        },
    }
}

/// Freeze the state and print results. Called with the session lock held,
/// so the countdown thread can never repaint over the output.
fn finish(
    session: &mut TypingState,
    stop: &AtomicBool,
    out: &mut impl Write,
    end: SessionEnd,
) -> Result<SessionEnd, Error> {
    stop.store(true, Ordering::SeqCst);
    let results = Results::from_state(session);
    queue!(out, Print("\r\n\r\n"))?;
    results.print(out)?;
    Ok(end)
}

struct CountdownHandle {
    // dropping the sender wakes and retires the countdown thread
    _cancel: mpsc::Sender<()>,
}

fn spawn_countdown(state: Arc<Mutex<TypingState>>, stop: Arc<AtomicBool>) -> CountdownHandle {
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

    thread::spawn(move || loop {
        match cancel_rx.recv_timeout(COUNTDOWN_TICK) {
            Err(RecvTimeoutError::Timeout) => {
                let mut session = state.lock().unwrap();
                if stop.load(Ordering::SeqCst) {
                    return;
                }
                let _ = render::paint(&mut session, &mut io::stdout());
            }
            _ => return,
        }
    });

    CountdownHandle { _cancel: cancel_tx }
}

fn session_header(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        SetForegroundColor(Color::Blue),
        Print(env!("CARGO_PKG_NAME")),
        ResetColor,
        Print("\r\n\r\n"),
    )
}

/// Swallow the tail of an escape sequence so arrow keys and friends do
/// not leak into the text as literal bytes.
fn drain_escape_sequence<K: KeySource>(keys: &K) {
    let deadline = Instant::now() + ESCAPE_DRAIN_WINDOW;
    for _ in 0..ESCAPE_DRAIN_MAX {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        if keys.recv_timeout(deadline - now).is_err() {
            return;
        }
    }
}

/// Ask what to do after a session. Buffered keypresses from overshooting
/// the end of the text are discarded first; anything but a qualifying
/// byte is ignored.
pub fn prompt_action<K: KeySource>(keys: &K) -> PromptAction {
    drain_keys(keys, PROMPT_DRAIN);

    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        Print("\r\n"),
        SetForegroundColor(Color::Blue),
        Print("(n)ext, (r)etry, (q)uit"),
        ResetColor,
    );

    loop {
        match keys.recv() {
            Ok(b'n') | Ok(b'N') | Ok(ENTER) | Ok(RETURN) => return PromptAction::Next,
            Ok(b'r') | Ok(b'R') => return PromptAction::Retry,
            Ok(b'q') | Ok(b'Q') | Ok(CTRL_C) => return PromptAction::Exit,
            Ok(_) => {}
            Err(_) => return PromptAction::Exit,
        }
    }
}

fn drain_keys<K: KeySource>(keys: &K, window: Duration) {
    let deadline = Instant::now() + window;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        if keys.recv_timeout(deadline - now).is_err() {
            return;
        }
    }
}
