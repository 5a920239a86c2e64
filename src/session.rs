use chrono::{DateTime, Local};
use clap::ValueEnum;

use crate::error::Error;
use crate::time_series::WpmSample;

/// Time limits a session can run under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, strum_macros::Display)]
pub enum SessionDuration {
    #[value(name = "15")]
    #[strum(to_string = "15s")]
    Fifteen,
    #[default]
    #[value(name = "30")]
    #[strum(to_string = "30s")]
    Thirty,
    #[value(name = "60")]
    #[strum(to_string = "60s")]
    Sixty,
}

impl SessionDuration {
    pub const ALL: [SessionDuration; 3] = [
        SessionDuration::Fifteen,
        SessionDuration::Thirty,
        SessionDuration::Sixty,
    ];

    pub fn secs(self) -> u64 {
        match self {
            SessionDuration::Fifteen => 15,
            SessionDuration::Thirty => 30,
            SessionDuration::Sixty => 60,
        }
    }

    /// Closest supported duration; ties resolve to the shorter one.
    pub fn nearest(secs: u64) -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|d| d.secs().abs_diff(secs))
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        match self {
            SessionDuration::Fifteen => SessionDuration::Thirty,
            SessionDuration::Thirty => SessionDuration::Sixty,
            SessionDuration::Sixty => SessionDuration::Fifteen,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SessionDuration::Fifteen => SessionDuration::Sixty,
            SessionDuration::Thirty => SessionDuration::Fifteen,
            SessionDuration::Sixty => SessionDuration::Thirty,
        }
    }
}

impl TryFrom<u64> for SessionDuration {
    type Error = Error;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.secs() == secs)
            .ok_or(Error::InvalidDuration(secs))
    }
}

/// Settings a session is created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub duration: SessionDuration,
    pub text_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Finished,
}

/// Snapshot pushed on every state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveMetrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub chars_typed: usize,
    pub correct_chars: usize,
    pub time_left: u64,
}

/// Final record of a session, pushed once when it finishes
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub chars_typed: usize,
    pub correct_chars: usize,
    pub reference: String,
    pub input: String,
    pub duration: SessionDuration,
    pub completed_at: DateTime<Local>,
    pub history: Vec<WpmSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Live(LiveMetrics),
    Finished(SessionResult),
}
