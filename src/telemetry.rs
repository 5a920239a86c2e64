use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_ENV: &str = "KEYRUSH_LOG";
pub const LOG_LEVEL_ENV: &str = "KEYRUSH_LOG_LEVEL";

/// Keeps the background log writer alive; drop it last to flush.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self { _guard: None }
    }

    pub fn is_enabled(&self) -> bool {
        self._guard.is_some()
    }
}

/// Install a file-backed subscriber.
///
/// The terminal is owned by the UI, so without a log file nothing is installed.
pub fn init_tracing(log_file: Option<&Path>, default_level: &str) -> TelemetryGuard {
    let path = match log_file.map(Path::to_path_buf).or_else(log_file_path_from_env) {
        Some(path) => path,
        None => return TelemetryGuard::disabled(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: failed to create log dir {}: {}", parent.display(), err);
            return TelemetryGuard::disabled();
        }
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: failed to open log file {}: {}", path.display(), err);
            return TelemetryGuard::disabled();
        }
    };

    let env_filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    if subscriber.try_init().is_err() {
        return TelemetryGuard::disabled();
    }

    TelemetryGuard {
        _guard: Some(guard),
    }
}

fn log_file_path_from_env() -> Option<PathBuf> {
    std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
