//! Diagnostics on stderr
//!
//! Command output (exports, refs) goes to stdout; everything logged here
//! goes to stderr so pipes stay clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set, otherwise `level`, otherwise `info`.
///
/// # Example
/// ```bash
/// RUST_LOG=imbib_bibtex=debug imbib-bibtex read refs.bib export
/// ```
pub fn init(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init();
}
