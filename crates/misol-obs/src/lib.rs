use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging.
/// - JSON logs by default, `MISOL_LOG_FORMAT=pretty` for a human-readable console
/// - RUST_LOG respected; default to "info,misol=debug"
pub fn init(service_name: &str) {
    let default_filter = "info,misol=debug";
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let pretty = std::env::var("MISOL_LOG_FORMAT").map_or(false, |f| f == "pretty");

    let registry = tracing_subscriber::registry().with(EnvFilter::new(env_filter));
    if pretty {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    }

    tracing::info!(service = %service_name, "Observability initialized");
}
