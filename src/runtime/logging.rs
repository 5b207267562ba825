use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, LogSettings};

/// Route `tracing` output to the log file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over `log.level`. If the file cannot be opened, logging
/// stays off and one line goes to stderr before the screen is taken over.
pub fn init(settings: &LogSettings) {
    let Some(path) = settings.path.clone().or_else(config::default_log_path) else {
        eprintln!("overture: no log location (HOME unset); logging disabled");
        return;
    };

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "overture: cannot open log file {}: {e}; logging disabled",
                path.display()
            );
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init();

    tracing::info!(path = %path.display(), "logging started");
}
