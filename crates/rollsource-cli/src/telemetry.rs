use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global log subscriber.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`. Output goes to
/// stderr so that drawn values on stdout stay machine-readable. Set
/// `RUST_LOG=rollsource=trace` to see every refill and nonce rotation.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()?;
    Ok(())
}
