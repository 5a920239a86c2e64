use crate::session::SessionResult;

/// Last finished session and the best WPM seen since the program started.
/// Lives only in memory.
#[derive(Debug, Default, Clone)]
pub struct ResultsSummary {
    last: Option<SessionResult>,
    best_wpm: u32,
}

impl ResultsSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished session. Returns true if it set a new best.
    pub fn record(&mut self, result: SessionResult) -> bool {
        let improved = result.wpm > self.best_wpm;
        if improved {
            self.best_wpm = result.wpm;
        }
        self.last = Some(result);
        improved
    }

    pub fn last(&self) -> Option<&SessionResult> {
        self.last.as_ref()
    }

    pub fn best_wpm(&self) -> u32 {
        self.best_wpm
    }

    /// One-line description of the last session
    pub fn details(&self) -> Option<String> {
        self.last.as_ref().map(|r| {
            format!(
                "You typed {} characters with {}% accuracy. Keep practicing to push your best WPM higher!",
                r.chars_typed, r.accuracy
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionDuration;
    use chrono::Local;

    fn result(wpm: u32) -> SessionResult {
        SessionResult {
            wpm,
            accuracy: 90,
            chars_typed: 40,
            correct_chars: 36,
            reference: "ref".into(),
            input: "inp".into(),
            duration: SessionDuration::Thirty,
            completed_at: Local::now(),
            history: vec![],
        }
    }

    #[test]
    fn test_empty_summary() {
        let s = ResultsSummary::new();
        assert!(s.last().is_none());
        assert_eq!(s.best_wpm(), 0);
        assert!(s.details().is_none());
    }

    #[test]
    fn test_best_tracks_maximum() {
        let mut s = ResultsSummary::new();
        assert!(s.record(result(40)));
        assert!(!s.record(result(30)));
        assert_eq!(s.best_wpm(), 40);
        assert_eq!(s.last().map(|r| r.wpm), Some(30));
        assert!(s.record(result(55)));
        assert_eq!(s.best_wpm(), 55);
    }

    #[test]
    fn test_zero_wpm_is_not_a_best() {
        let mut s = ResultsSummary::new();
        assert!(!s.record(result(0)));
        assert_eq!(s.best_wpm(), 0);
        assert!(s.last().is_some());
    }

    #[test]
    fn test_details() {
        let mut s = ResultsSummary::new();
        s.record(result(10));
        assert_eq!(
            s.details().unwrap(),
            "You typed 40 characters with 90% accuracy. Keep practicing to push your best WPM higher!"
        );
    }
}
