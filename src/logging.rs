use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "THREADS_CLIENT_LOG";

const DEFAULT_FILTER: &str = "threads_client=info";

/// Per-process log file for the base path in `value`, or `None` when unset.
///
/// The process id is appended so that concurrent runs do not clobber each
/// other: `{path}.{pid}`
fn log_file_path(value: Option<String>) -> Option<PathBuf> {
    let base = value.filter(|p| !p.trim().is_empty())?;
    Some(PathBuf::from(format!("{}.{}", base, std::process::id())))
}

/// Install the tracing subscriber if `THREADS_CLIENT_LOG` is set.
///
/// Logging is off by default so that command output stays clean. `RUST_LOG`
/// overrides the filter.
pub fn init_tracing() {
    let Some(path) = log_file_path(std::env::var(LOG_ENV).ok()) else {
        return;
    };

    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot create log file {}: {}", path.display(), e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
}
