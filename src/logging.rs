use std::env;
use std::fs::File;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// The terminal belongs to the game, so logs go to a file instead.
const LOG_FILE: &str = "snake.log";

/// Installs a file logger when `RUST_LOG` is set. Without it, tracing stays a no-op.
pub fn init() -> Result<()> {
    let filter = match filter_from(env::var(EnvFilter::DEFAULT_ENV).ok())? {
        Some(filter) => filter,
        None => return Ok(()),
    };

    let file = File::create(LOG_FILE).with_context(|| format!("Failed to create {}", LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))
}

/// `None` means logging is off; a value that does not parse is an error.
fn filter_from(directives: Option<String>) -> Result<Option<EnvFilter>> {
    match directives {
        None => Ok(None),
        Some(directives) => EnvFilter::try_new(&directives)
            .map(Some)
            .with_context(|| format!("Invalid {} value {:?}", EnvFilter::DEFAULT_ENV, directives)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_disables_logging() {
        assert!(filter_from(None).unwrap().is_none());
    }

    #[test]
    fn valid_directives() {
        assert!(filter_from(Some("debug".to_string())).unwrap().is_some());
        assert!(filter_from(Some("snake=info".to_string())).unwrap().is_some());
    }

    #[test]
    fn malformed_directives_are_reported() {
        let err = filter_from(Some("snake=loud".to_string())).unwrap_err();
        assert!(format!("{:#}", err).contains("RUST_LOG"));
    }
}
