// State-machine and statistics properties exercised together, the way the
// session loop applies them.

use std::time::Instant;

use klack::config::{Config, TextSource};
use klack::stats::Results;
use klack::typing::TypingState;

fn untimed_state(target: &str) -> TypingState {
    let config = Config {
        text_source: TextSource::Words,
        word_count: 1,
        time_seconds: 0,
    };
    TypingState::new(target.to_string(), &config, 80)
}

/// Apply a script where backspace is encoded as 0x08.
fn apply(state: &mut TypingState, script: &[u8]) {
    for &byte in script {
        match byte {
            0x08 => state.backspace(),
            b' ' => state.type_space(),
            other => state.type_char(other),
        }
    }
}

#[test]
fn counters_stay_ordered_through_a_messy_session() {
    let mut state = untimed_state("the cat sat");
    state.begin();

    // typos, corrections, a skipped word, and some stray spaces
    let script = b"thx\x08e cq\x08at zat\x08\x08\x08sat";
    for &byte in script.iter() {
        match byte {
            0x08 => state.backspace(),
            b' ' => state.type_space(),
            other => state.type_char(other),
        }
        assert!(state.errors <= state.chars_typed);
        assert!(state.errors <= state.raw_errors);
        assert!(state.chars_typed <= state.raw_keystrokes);
        assert!(state.position <= state.session_text.len());
    }

    let results = Results::from_state(&state);
    assert!((0.0..=100.0).contains(&results.accuracy));
    assert!((0.0..=100.0).contains(&results.raw_accuracy));
}

#[test]
fn backspace_reverses_a_typed_error_for_corrected_counters_only() {
    let mut state = untimed_state("abcd");
    apply(&mut state, b"ab");

    let before = (
        state.chars_typed,
        state.errors,
        state.raw_keystrokes,
        state.raw_errors,
    );

    apply(&mut state, b"x\x08");

    assert_eq!(state.chars_typed, before.0);
    assert_eq!(state.errors, before.1);
    assert_eq!(state.raw_keystrokes, before.2 + 1);
    assert_eq!(state.raw_errors, before.3 + 1);
}

#[test]
fn skipped_slots_are_attributed_to_raw_errors_exactly_once() {
    let mut state = untimed_state("abcdef ghi");
    apply(&mut state, b"ab ");

    // four abandoned slots (c, d, e, f), each exactly one raw error
    assert_eq!(state.raw_errors, 4);
    assert_eq!(state.errors, 0);
    let skipped: Vec<usize> = (0..state.position)
        .filter(|&i| !state.typed[i])
        .collect();
    assert_eq!(skipped, vec![2, 3, 4, 5]);
}

#[test]
fn accuracy_pairs_diverge_after_corrections() {
    let mut state = untimed_state("word");
    state.started_at = Some(Instant::now());
    apply(&mut state, b"wxx\x08\x08ord");

    let results = Results::from_state(&state);
    assert_eq!(results.accuracy, 100.0);
    assert!(results.raw_accuracy < 100.0);
    assert_eq!(results.errors, 0);
    assert_eq!(results.raw_errors, 2);
    assert_eq!(results.backspaces, 2);
}

#[test]
fn wpm_reflects_correct_characters_only() {
    let mut state = untimed_state("abcdef");
    state.started_at = Some(Instant::now() - std::time::Duration::from_secs(60));
    apply(&mut state, b"abcxxx");

    let results = Results::from_state(&state);
    // three correct characters in one minute
    assert!((results.wpm - 0.6).abs() < 0.05, "wpm = {}", results.wpm);
    assert_eq!(results.correct_chars, 3);
}
