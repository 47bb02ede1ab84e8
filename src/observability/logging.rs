//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Map the configured numeric `log_level` onto a tracing filter
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - Human-readable output for local environments, JSON everywhere else

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a numeric log level onto a tracing level.
///
/// 0 = debug, 1 = info, 2 = warn, 3 and above = error; negative = trace.
pub fn level_from_config(level: i64) -> Level {
    match level {
        i64::MIN..=-1 => Level::TRACE,
        0 => Level::DEBUG,
        1 => Level::INFO,
        2 => Level::WARN,
        _ => Level::ERROR,
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(
    level: i64,
    is_local_environment: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_from_config(level).as_str().to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    if is_local_environment {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_levels_map_to_tracing_levels() {
        assert_eq!(level_from_config(-1), Level::TRACE);
        assert_eq!(level_from_config(0), Level::DEBUG);
        assert_eq!(level_from_config(1), Level::INFO);
        assert_eq!(level_from_config(2), Level::WARN);
        assert_eq!(level_from_config(7), Level::ERROR);
    }
}
