use std::time::Duration;

/// Characters per "word" in the usual typing-speed convention.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Derived figures for one (reference, input, elapsed) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub chars_typed: usize,
    pub correct_chars: usize,
}

/// Count positions where `input` matches `reference`, over the overlapping prefix only.
pub fn correct_chars(reference: &str, input: &str) -> usize {
    reference
        .chars()
        .zip(input.chars())
        .filter(|(expected, typed)| expected == typed)
        .count()
}

/// Percentage of typed characters that were correct, rounded; 0 when nothing was typed.
pub fn accuracy(correct_chars: usize, chars_typed: usize) -> u32 {
    if chars_typed == 0 {
        return 0;
    }
    ((correct_chars as f64 / chars_typed as f64) * 100.0).round() as u32
}

/// Words per minute from correct characters. Elapsed time is floored at one second.
pub fn wpm(correct_chars: usize, elapsed_secs: u64) -> u32 {
    let words = correct_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_secs.max(1) as f64 / 60.0;

    (words / minutes).round().max(0.0) as u32
}

/// Whole seconds between start and `now`, capped at the session limit.
pub fn elapsed_secs(since_start: Duration, limit_secs: u64) -> u64 {
    since_start.as_secs().min(limit_secs)
}

pub fn compute(reference: &str, input: &str, elapsed_secs: u64) -> Metrics {
    let chars_typed = input.chars().count();
    let correct_chars = correct_chars(reference, input);

    Metrics {
        wpm: wpm(correct_chars, elapsed_secs),
        accuracy: accuracy(correct_chars, chars_typed),
        chars_typed,
        correct_chars,
    }
}
