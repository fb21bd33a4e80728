//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so stdout carries only the scenario report.
//! `RUST_LOG` wins over `--verbose`; the default level is `warn`.
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub fn init_subscriber(verbose: bool) {
    let filter = build_env_filter(verbose);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();
    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(default_directive(verbose))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,da_acceptance=debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "warn,da_acceptance=debug");
    }
}
