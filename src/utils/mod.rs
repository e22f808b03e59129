pub mod build_info;

use std::sync::Once;

use fintrack_config::DEFAULT_LOG_FILTER;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with the default `fintrack=info` directive.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Initializes tracing with `directive` layered over `RUST_LOG`.
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_tracing_with(directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        for part in directive.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.parse() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(err) => eprintln!("ignoring invalid log directive `{part}`: {err}"),
            }
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
