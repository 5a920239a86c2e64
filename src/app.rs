use std::sync::mpsc::Receiver;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::countdown::{Clock, SystemClock};
use crate::engine::TypingEngine;
use crate::session::{LiveMetrics, SessionConfig, SessionDuration, SessionEvent};
use crate::summary::ResultsSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Glue between the terminal and the engine: turns keys into buffer values
/// and control actions, and folds engine notifications into view state.
#[derive(Debug)]
pub struct App<C = SystemClock> {
    pub engine: TypingEngine<C>,
    pub summary: ResultsSummary,
    pub live: LiveMetrics,
    pub new_best: bool,
    events: Receiver<SessionEvent>,
}

impl<C: Clock> App<C> {
    pub fn new(mut engine: TypingEngine<C>) -> Self {
        let events = engine.subscribe();
        let live = engine.live();
        Self {
            engine,
            summary: ResultsSummary::new(),
            live,
            new_best: false,
            events,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('c') if ctrl => return AppAction::Quit,
            KeyCode::Left => self.engine.restart(),
            KeyCode::Right => self.engine.next_text(),
            KeyCode::Up => self.engine.set_duration(self.engine.duration().next()),
            KeyCode::Down => self.engine.set_duration(self.engine.duration().prev()),
            KeyCode::F(n @ 1..=3) => {
                self.engine
                    .set_duration(SessionDuration::ALL[usize::from(n) - 1]);
            }
            _ if self.engine.is_finished() => self.on_results_key(key),
            _ => self.on_typing_key(key, ctrl),
        }
        // a steady stream of keys can keep the runner from ever timing out
        self.engine.poll();
        self.drain_events();
        AppAction::Continue
    }

    pub fn on_tick(&mut self) {
        self.engine.poll();
        self.drain_events();
    }

    fn on_typing_key(&mut self, key: KeyEvent, ctrl: bool) {
        let current = self.engine.input();
        let next = match key.code {
            KeyCode::Char('w') | KeyCode::Backspace if ctrl => delete_last_word(current),
            KeyCode::Char(c) if !ctrl => {
                let mut s = current.to_owned();
                s.push(c);
                s
            }
            KeyCode::Backspace => {
                let mut s = current.to_owned();
                s.pop();
                s
            }
            _ => return,
        };
        if next != self.engine.input() {
            self.engine.submit_input(&next);
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => self.engine.restart(),
            KeyCode::Char('n') => self.engine.next_text(),
            _ => {}
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Live(live) => self.live = live,
                SessionEvent::Finished(result) => {
                    self.new_best = self.summary.record(result);
                    if self.new_best {
                        info!(best_wpm = self.summary.best_wpm(), "new best");
                    }
                }
            }
        }
    }

    /// Settings worth remembering for the next run
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration: self.engine.duration(),
            text_index: self.engine.text_index(),
        }
    }
}

/// Drop the last word (and any whitespace after it)
fn delete_last_word(s: &str) -> String {
    let trimmed = s.trim_end();
    let keep = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    s[..keep].to_owned()
}
