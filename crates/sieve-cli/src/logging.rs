//! Logging setup for the CLI.

use tracing::Level;

/// Map `-v` count and `--quiet` to a log level.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Initialize structured logging to stderr.
///
/// `RUST_LOG` overrides the level derived from the flags.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level_for(verbose, quiet).as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Logging can only be initialized once per process, so only the level
    // mapping is tested here.
    #[test]
    fn test_verbosity_levels() {
        let cases = [
            ((true, 0), Level::ERROR),
            ((true, 5), Level::ERROR),
            ((false, 0), Level::INFO),
            ((false, 1), Level::DEBUG),
            ((false, 2), Level::TRACE),
            ((false, 9), Level::TRACE),
        ];
        for ((quiet, verbose), expected) in cases {
            assert_eq!(level_for(verbose, quiet), expected, "quiet={}, verbose={}", quiet, verbose);
        }
    }
}
