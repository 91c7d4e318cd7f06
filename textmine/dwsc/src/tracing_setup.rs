//! Logging setup for the dws CLI.
//!
//! The filter string comes from `DWS_LOG`, falling back to `RUST_LOG` and
//! then to `warn`. Setting `DWS_LOG_TREE` renders spans as an indented
//! tree on stderr instead of the flat compact format.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Install the stderr subscriber.
///
/// A no-op once a global subscriber is installed, so repeated calls are
/// harmless.
pub fn init() {
    let format: Box<dyn Layer<Registry> + Send + Sync> =
        if std::env::var_os("DWS_LOG_TREE").is_some() {
            Box::new(
                tracing_tree::HierarchicalLayer::new(4)
                    .with_writer(std::io::stderr)
                    .with_targets(true)
                    .with_indent_lines(true),
            )
        } else {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
        };

    let _ = Registry::default().with(format).with(filter()).try_init();
}

fn filter() -> EnvFilter {
    ["DWS_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|name| EnvFilter::try_from_env(name).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
