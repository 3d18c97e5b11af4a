use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the tracing subscriber with env-based filtering.
///
/// `forced` wins when given (the CLI's `--verbose`). Otherwise `RUST_LOG`,
/// then `LOG_LEVEL`, then `default_level` set the filter. Later calls are
/// ignored.
pub fn init_tracing(default_level: &str, forced: Option<&str>) {
    let filter = match forced {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env("RUST_LOG")
            .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
            .unwrap_or_else(|_| EnvFilter::new(default_level)),
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing("info", None);
        init_tracing("info", Some("debug"));
        tracing::debug!("still logging after a second init");
    }
}
