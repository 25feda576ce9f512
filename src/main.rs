use std::io;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rentdesk::config::Config;
use rentdesk::console::Console;
use rentdesk::engine::Engine;
use rentdesk::store::Store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env();
    rentdesk::observability::init(config.metrics_port);

    let store = Store::open(&config.data_dir)?;
    let engine = Engine::load(
        &store,
        config.vat_rate,
        &config.admin_email,
        &config.admin_password,
    )?;

    info!("rentdesk ready");
    info!("  data_dir: {}", config.data_dir.display());
    info!("  vat_rate: {}", config.vat_rate);
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let mut console = Console::new(engine, Some(store));
    console.run(io::stdin().lock(), io::stdout().lock())?;

    info!("input closed, exiting");
    Ok(())
}
