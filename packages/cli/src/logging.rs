// ABOUTME: Tracing subscriber setup for the itms binary
// ABOUTME: RUST_LOG wins when set; otherwise warnings only, or ITMS debug output with --verbose

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,itms=debug,itms_cli=debug,itms_client=debug,itms_controllers=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber, writing to stderr so tables on stdout stay clean
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    // A second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
        assert!(default_directives(true).contains("itms_client=debug"));
    }
}
