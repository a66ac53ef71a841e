//! Boot: logging init, config load, device construction.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::ParserConfig;
use crate::device::DeviceProcessor;
use crate::devices::cisco_asa;

/// Initialise the tracing / logging subsystem.
///
/// `RUST_LOG` wins when set; otherwise `debug` picks the crate's level.
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "lognorm=debug" } else { "lognorm=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config, initialise logging and compile the device rule tree.
///
/// Returns `(DeviceProcessor, ParserConfig)` on success.
pub fn boot() -> Result<(DeviceProcessor, ParserConfig), Box<dyn std::error::Error>> {
    // Logging is not up yet, so config errors go straight to stderr.
    let config = ParserConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    init_logging(config.debug);

    info!("Starting lognorm v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Taxonomies: ecs={}, rsa={}, keep_raw={}, tz_offset={}",
        config.ecs, config.rsa, config.keep_raw, config.tz_offset
    );

    let processor = cisco_asa::processor(&config).map_err(|e| {
        error!("Failed to build rule tree: {}", e);
        e
    })?;
    info!("Compiled rule tree for device {}", processor.name());

    Ok((processor, config))
}
