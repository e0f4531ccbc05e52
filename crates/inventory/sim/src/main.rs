//! Fixed-step inventory simulation entry point.
mod config;
mod driver;
mod script;

use anyhow::Result;
use config::SimConfig;
use driver::Driver;
use inventory_content::ContentFactory;
use script::Script;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    tracing::info!(data_dir = %config.data_dir.display(), ticks = config.ticks, tick_seconds = config.tick_seconds, "starting inventory simulation");

    // Catalog or config defects are packaging errors: stop here
    let inventory = ContentFactory::new(&config.data_dir).build_controller()?;
    let script = match &config.script {
        Some(path) => Script::load(path)?,
        None => Script::builtin(),
    };

    let summary = Driver::new(inventory, script).run(config.ticks, config.tick_seconds)?;
    tracing::info!(?summary, "simulation finished");

    Ok(())
}
