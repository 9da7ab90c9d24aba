use tracing_subscriber::EnvFilter;
use ursync::Verbosity;

/// Default filter directive for a verbosity level.
pub fn level_for(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Silent => "error",
        Verbosity::Quiet | Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    }
}

/// Initialize structured logging on stderr.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the level
/// derived from `verbosity`.
pub fn init(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_levels_open_up_the_filter() {
        assert_eq!(level_for(Verbosity::Normal), "warn");
        assert_eq!(level_for(Verbosity::Verbose), "info");
        assert_eq!(level_for(Verbosity::Debug), "debug");
        assert_eq!(level_for(Verbosity::Silent), "error");
    }
}
