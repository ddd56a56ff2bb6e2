//! Logging bootstrap: `RUST_LOG` for level filtering, `QNV_LOG_FORMAT` for
//! the renderer (`pretty` the default, or `json` for structured output).

use tracing_subscriber::EnvFilter;

/// Name of the environment variable selecting the log output format.
pub const LOG_FORMAT_VAR: &str = "QNV_LOG_FORMAT";

/// Initialises the global `tracing` subscriber. Safe to call at most once;
/// a second call is a no-op, logged at debug level rather than panicking,
/// since a double-init is a harmless programming mistake, not a fatal one.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info"));
    let format = std::env::var(LOG_FORMAT_VAR).unwrap_or_default();

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    if let Err(err) = result {
        report_logging_init_error(&err);
    }
}

/// A subscriber was already installed; this is not fatal but worth a
/// diagnostic since it usually indicates the binary's `main` ran its setup
/// twice (e.g. once in a test harness, once in the real entry point).
#[expect(
    clippy::print_stderr,
    reason = "logging itself is not yet available when subscriber init fails"
)]
fn report_logging_init_error(err: &(dyn std::error::Error + 'static)) {
    eprintln!("qnv: logging already initialised: {err}");
}

#[cfg(test)]
mod tests {
    use super::LOG_FORMAT_VAR;

    #[test]
    fn log_format_var_name_is_stable() {
        assert_eq!(LOG_FORMAT_VAR, "QNV_LOG_FORMAT");
    }
}
