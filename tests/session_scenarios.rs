use std::time::Duration;

use assert_matches::assert_matches;
use keyrush::countdown::ManualClock;
use keyrush::engine::TypingEngine;
use keyrush::samples::SampleTexts;
use keyrush::session::{
    LiveMetrics, SessionConfig, SessionDuration, SessionEvent, SessionPhase, SessionResult,
};

fn engine(text: &str, duration: SessionDuration) -> (TypingEngine<ManualClock>, ManualClock) {
    let samples = SampleTexts::new("scenarios", vec![text.to_string()]).unwrap();
    let clock = ManualClock::new();
    let engine = TypingEngine::with_clock(
        samples,
        SessionConfig {
            duration,
            text_index: 0,
        },
        clock.clone(),
    );
    (engine, clock)
}

fn final_results(events: impl Iterator<Item = SessionEvent>) -> Vec<SessionResult> {
    events
        .filter_map(|e| match e {
            SessionEvent::Finished(r) => Some(r),
            SessionEvent::Live(_) => None,
        })
        .collect()
}

#[test]
fn instant_exact_match_finishes_immediately() {
    let (mut engine, _clock) = engine("cat", SessionDuration::Thirty);
    let rx = engine.subscribe();

    engine.submit_input("cat");

    assert_eq!(engine.phase(), SessionPhase::Finished);
    let m = engine.metrics();
    assert_eq!(m.chars_typed, 3);
    assert_eq!(m.correct_chars, 3);
    assert_eq!(m.accuracy, 100);
    // elapsed is 0 and floored to one second: 0.6 words in 1/60 min
    assert_eq!(m.wpm, 36);
    assert_eq!(engine.time_left(), 30);

    let results = final_results(rx.try_iter());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].reference, "cat");
    assert_eq!(results[0].input, "cat");
    assert_eq!(results[0].duration, SessionDuration::Thirty);
}

#[test]
fn one_wrong_char_gives_sixty_seven_percent() {
    let (mut engine, _clock) = engine("cat", SessionDuration::Thirty);

    engine.submit_input("cbt");

    let m = engine.metrics();
    assert_eq!(m.correct_chars, 2);
    assert_eq!(m.accuracy, 67);
    assert!(engine.is_finished());
}

#[test]
fn countdown_expiry_with_empty_buffer_reports_zeros() {
    // the countdown only runs once typing starts: an empty buffer
    // submission counts as no input, so start with a char and delete it
    let (mut engine, clock) = engine("the cat sat on the mat", SessionDuration::Fifteen);
    let rx = engine.subscribe();

    engine.submit_input("x");
    engine.submit_input("");
    for _ in 0..15 {
        clock.advance(Duration::from_secs(1));
        engine.poll();
    }

    assert!(engine.is_finished());
    let m = engine.metrics();
    assert_eq!(m.chars_typed, 0);
    assert_eq!(m.accuracy, 0);
    assert_eq!(m.wpm, 0);

    let results = final_results(rx.try_iter());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].wpm, 0);
    assert_eq!(results[0].history.len(), 15);
}

#[test]
fn twenty_five_correct_chars_in_thirty_seconds_is_ten_wpm() {
    let text = "practice consistently and your words per minute will climb";
    let (mut engine, clock) = engine(text, SessionDuration::Thirty);
    let rx = engine.subscribe();

    engine.submit_input(&text[..1]);
    clock.advance(Duration::from_millis(29_500));
    engine.submit_input(&text[..25]);
    clock.advance(Duration::from_millis(500));
    engine.poll();

    assert!(engine.is_finished());
    assert_eq!(engine.elapsed_secs(), 30);
    assert_eq!(engine.metrics().wpm, 10);

    let results = final_results(rx.try_iter());
    assert_matches!(
        results.as_slice(),
        [SessionResult {
            wpm: 10,
            accuracy: 100,
            correct_chars: 25,
            chars_typed: 25,
            ..
        }]
    );
}

#[test]
fn changing_duration_mid_run_resets_to_idle() {
    let (mut engine, clock) = engine("the cat sat on the mat", SessionDuration::Thirty);
    let rx = engine.subscribe();

    engine.submit_input("the c");
    clock.advance(Duration::from_secs(4));
    engine.poll();
    engine.set_duration(SessionDuration::Sixty);

    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert_eq!(engine.input(), "");
    assert!(!engine.has_started());
    assert_eq!(engine.time_left(), 60);

    let last = rx.try_iter().last();
    assert_matches!(
        last,
        Some(SessionEvent::Live(LiveMetrics {
            time_left: 60,
            chars_typed: 0,
            wpm: 0,
            accuracy: 0,
            ..
        }))
    );
}

#[test]
fn finished_state_is_sticky_until_restart() {
    let (mut engine, clock) = engine("cat", SessionDuration::Fifteen);

    engine.submit_input("cat");
    let after_finish = engine.metrics();
    for step in 0..20 {
        clock.advance(Duration::from_secs(1));
        engine.poll();
        engine.submit_input(if step % 2 == 0 { "" } else { "dog" });
        assert!(engine.is_finished());
        assert_eq!(engine.input(), "cat");
        assert_eq!(engine.metrics(), after_finish);
    }

    engine.restart();
    assert_eq!(engine.phase(), SessionPhase::Idle);
}

#[test]
fn next_text_cycles_builtin_catalog() {
    let samples = SampleTexts::builtin().unwrap();
    let count = samples.len();
    let mut engine =
        TypingEngine::with_clock(samples, SessionConfig::default(), ManualClock::new());
    let first = engine.reference().to_owned();

    for _ in 0..count {
        engine.next_text();
    }

    assert_eq!(engine.reference(), first);
    assert_eq!(engine.text_index(), 0);
}

#[test]
fn every_session_reports_exactly_one_result() {
    let (mut engine, clock) = engine("ab", SessionDuration::Fifteen);
    let rx = engine.subscribe();

    engine.submit_input("ab");
    engine.restart();
    engine.submit_input("a");
    clock.advance(Duration::from_secs(15));
    engine.poll();
    engine.next_text();
    engine.submit_input("x");
    engine.set_duration(SessionDuration::Thirty);

    let results = final_results(rx.try_iter());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].input, "ab");
    assert_eq!(results[1].input, "a");
}
