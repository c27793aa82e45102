use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVES: &str =
    "runway=info,runway_core=info,runway_sheets=info,runway_finance=info";

/// Logs go to stderr so `--json` output on stdout stays parseable.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let filter = if verbose {
            EnvFilter::new(DEFAULT_DIRECTIVES.replace("=info", "=debug"))
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
        };

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}
