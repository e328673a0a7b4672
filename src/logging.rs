/// Tracing setup.
///
/// The terminal is in raw mode on the alternate screen while the game runs,
/// so log lines can never go to stdout/stderr. They go to the file named by
/// `general.log_file`; with no file configured no subscriber is installed
/// and every `tracing` macro is a no-op.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;
use crate::error::GameError;

/// Install the global subscriber. `RUST_LOG` overrides `log_filter`.
pub fn init(cfg: &GeneralConfig) -> Result<(), GameError> {
    if cfg.log_file.as_os_str().is_empty() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_filter))
        .map_err(|e| GameError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| GameError::Logging(e.to_string()))?;

    tracing::info!(path = %cfg.log_file.display(), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_path_disables_logging() {
        let cfg = GeneralConfig { log_file: PathBuf::new(), log_filter: "info".into() };
        assert!(init(&cfg).is_ok());
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let cfg = GeneralConfig {
            log_file: PathBuf::from("/nonexistent-dir/herding/game.log"),
            log_filter: "info".into(),
        };
        assert!(matches!(init(&cfg), Err(GameError::Io(_))));
    }
}
