// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod countdown;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod summary;
pub mod telemetry;
pub mod time_series;
pub mod ui;

pub use engine::TypingEngine;
pub use error::{Error, Result};
pub use session::{LiveMetrics, SessionDuration, SessionEvent, SessionPhase, SessionResult};
