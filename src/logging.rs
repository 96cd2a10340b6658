use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV_VAR: &str = "BLOG_FEED_LOG";

/// Install the file logger named by `BLOG_FEED_LOG`, if set.
///
/// The CLI prints one JSON snapshot per stdout line and consumers parse that
/// stream as-is, so no layer ever writes to stdout or stderr. Without the
/// variable, tracing stays uninstalled and every `tracing` macro is a no-op.
///
/// The file gets a `.{timestamp}.{pid}` suffix so concurrent runs each keep
/// their own log. Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let Some(log_path) = std::env::var(LOG_ENV_VAR).ok() else {
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::SystemTime);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
