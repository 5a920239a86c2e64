use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info};

use crate::countdown::{Clock, Countdown, SystemClock};
use crate::error::Result;
use crate::metrics::{self, Metrics};
use crate::samples::SampleTexts;
use crate::session::{
    LiveMetrics, SessionConfig, SessionDuration, SessionEvent, SessionPhase, SessionResult,
};
use crate::time_series::WpmSample;

/// The single live typing session plus the countdown that bounds it.
///
/// Input arrives as the whole current buffer, not as deltas. Every accepted
/// change, countdown tick or reset is pushed to subscribers as
/// [`SessionEvent::Live`]; entering `Finished` additionally pushes one
/// [`SessionEvent::Finished`].
#[derive(Debug)]
pub struct TypingEngine<C = SystemClock> {
    samples: SampleTexts,
    text_index: usize,
    reference: String,
    input: String,
    duration: SessionDuration,
    countdown: Countdown,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    history: Vec<WpmSample>,
    subscribers: Vec<Sender<SessionEvent>>,
    clock: C,
}

impl TypingEngine<SystemClock> {
    pub fn new(samples: SampleTexts, config: SessionConfig) -> Self {
        Self::with_clock(samples, config, SystemClock)
    }
}

impl<C: Clock> TypingEngine<C> {
    pub fn with_clock(samples: SampleTexts, config: SessionConfig, clock: C) -> Self {
        let text_index = samples.wrap(config.text_index);
        let reference = samples.get(text_index).to_owned();

        Self {
            samples,
            text_index,
            reference,
            input: String::new(),
            duration: config.duration,
            countdown: Countdown::new(config.duration.secs()),
            started_at: None,
            finished_at: None,
            history: Vec::new(),
            subscribers: Vec::new(),
            clock,
        }
    }

    /// Register for live and final notifications
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn submit_input(&mut self, text: &str) {
        if self.is_finished() {
            debug!("input ignored, session already finished");
            return;
        }

        let now = self.clock.now();
        // ticks that came due before this keystroke go first; one landing on
        // the same instant loses to the keystroke
        self.apply_ticks(now, false);
        if self.is_finished() {
            debug!("input arrived after the countdown expired");
            return;
        }

        if self.started_at.is_none() {
            if text.is_empty() {
                return;
            }
            self.started_at = Some(now);
            self.countdown.arm(now);
            debug!(duration = self.duration.secs(), "session started");
        }

        self.input.clear();
        self.input.push_str(text);

        if self.input.chars().count() >= self.reference.chars().count() {
            self.finish(now);
        } else {
            self.emit_live();
        }
    }

    /// Apply any countdown ticks whose deadline has passed.
    /// Returns true if at least one tick fired.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        self.apply_ticks(now, true)
    }

    fn apply_ticks(&mut self, now: Instant, inclusive: bool) -> bool {
        if self.phase() != SessionPhase::Running {
            return false;
        }

        let mut ticked = false;
        loop {
            let fired = if inclusive {
                self.countdown.fire_if_due(now)
            } else {
                self.countdown.fire_if_overdue(now)
            };
            if !fired {
                break;
            }
            ticked = true;
            let second = self.countdown.total_secs() - self.countdown.remaining_secs();
            let correct = metrics::correct_chars(&self.reference, &self.input);
            self.history
                .push(WpmSample::new(second, metrics::wpm(correct, second)));

            if self.countdown.is_expired() {
                debug!("countdown expired");
                self.finish(now);
                break;
            }
            self.emit_live();
        }
        ticked
    }

    /// Back to idle with the same text and duration
    pub fn restart(&mut self) {
        self.reset_session();
        debug!(text_index = self.text_index, "session restarted");
        self.emit_live();
    }

    /// Move to the next sample text (wrapping) and restart
    pub fn next_text(&mut self) {
        self.text_index = self.samples.next_index(self.text_index);
        self.reference = self.samples.get(self.text_index).to_owned();
        self.reset_session();
        debug!(text_index = self.text_index, "switched to next text");
        self.emit_live();
    }

    pub fn set_duration(&mut self, duration: SessionDuration) {
        self.duration = duration;
        self.reset_session();
        debug!(duration = duration.secs(), "duration changed");
        self.emit_live();
    }

    /// Like [`set_duration`](Self::set_duration) for a raw number of seconds
    pub fn set_duration_secs(&mut self, secs: u64) -> Result<()> {
        let duration = SessionDuration::try_from(secs)?;
        self.set_duration(duration);
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        if self.finished_at.is_some() {
            SessionPhase::Finished
        } else if self.started_at.is_some() {
            SessionPhase::Running
        } else {
            SessionPhase::Idle
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn duration(&self) -> SessionDuration {
        self.duration
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    pub fn time_left(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn history(&self) -> &[WpmSample] {
        &self.history
    }

    /// Whole seconds since the first keystroke, frozen once finished
    pub fn elapsed_secs(&self) -> u64 {
        match self.started_at {
            None => 0,
            Some(started) => {
                let end = self.finished_at.unwrap_or_else(|| self.clock.now());
                metrics::elapsed_secs(
                    end.saturating_duration_since(started),
                    self.duration.secs(),
                )
            }
        }
    }

    pub fn metrics(&self) -> Metrics {
        metrics::compute(&self.reference, &self.input, self.elapsed_secs())
    }

    pub fn live(&self) -> LiveMetrics {
        let m = self.metrics();
        LiveMetrics {
            wpm: m.wpm,
            accuracy: m.accuracy,
            chars_typed: m.chars_typed,
            correct_chars: m.correct_chars,
            time_left: self.time_left(),
        }
    }

    fn reset_session(&mut self) {
        self.input.clear();
        self.started_at = None;
        self.finished_at = None;
        self.history.clear();
        self.countdown.reset(self.duration.secs());
    }

    fn finish(&mut self, now: Instant) {
        self.countdown.cancel();
        self.finished_at = Some(now);

        let m = self.metrics();
        info!(
            wpm = m.wpm,
            accuracy = m.accuracy,
            chars_typed = m.chars_typed,
            correct_chars = m.correct_chars,
            duration = self.duration.secs(),
            "session finished"
        );

        self.emit_live();
        let result = SessionResult {
            wpm: m.wpm,
            accuracy: m.accuracy,
            chars_typed: m.chars_typed,
            correct_chars: m.correct_chars,
            reference: self.reference.clone(),
            input: self.input.clone(),
            duration: self.duration,
            completed_at: Local::now(),
            history: self.history.clone(),
        };
        self.emit(SessionEvent::Finished(result));
    }

    fn emit_live(&mut self) {
        let live = self.live();
        self.emit(SessionEvent::Live(live));
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
