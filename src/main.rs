use anyhow::{Context, Result};
use log::info;

use auction_ledger::app::{self, Config};

fn main() -> Result<()> {
    let config = match Config::from_args(std::env::args()) {
        Ok(config) => config,
        Err(auction_ledger::common::error::AppError::Config(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .format_timestamp_millis()
        .init();

    info!("auction-ledger v{}", env!("CARGO_PKG_VERSION"));
    app::run(&config).context("auction session failed")?;
    Ok(())
}
