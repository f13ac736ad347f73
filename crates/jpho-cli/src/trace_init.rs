use std::sync::Once;

static INIT: Once = Once::new();

/// Log to stderr. The filter comes from `RUST_LOG`, defaulting to
/// `jpho_core=info`; `verbose` raises the default to debug.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose { "jpho_core=debug" } else { "jpho_core=info" };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
            )
            .init();
    });
}
