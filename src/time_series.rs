/// WPM reading taken at a whole second of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WpmSample {
    pub second: u64,
    pub wpm: u32,
}

impl WpmSample {
    pub fn new(second: u64, wpm: u32) -> Self {
        Self { second, wpm }
    }
}

impl From<WpmSample> for (f64, f64) {
    fn from(s: WpmSample) -> Self {
        (s.second as f64, s.wpm as f64)
    }
}

/// Chart-ready (x, y) pairs
pub fn to_points(samples: &[WpmSample]) -> Vec<(f64, f64)> {
    samples.iter().copied().map(Into::into).collect()
}
