use quake_backend::config;
use quake_backend::module::quake::{EarthquakeLoader, Earthquakes, UsgsFetcher};

use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = config::read_config(&config_path)?;

    // Initialize logging
    let _logging_guard = quake_backend::logging::init_logging(
        &config.log_dir,
        "quake-backend",
        &config.log_level,
    )?;

    tracing::info!("Quake backend starting...");
    tracing::info!("Using earthquake feed at {}", config.api_base);

    let fetcher = UsgsFetcher::new(config.api_base.clone(), config.request_timeout())?;
    let loader = Arc::new(EarthquakeLoader::new(Arc::new(fetcher), config.parser()?));
    let query = config.query();

    let earthquakes = loader.spawn_load(query.clone()).await?;
    print_earthquakes(earthquakes.as_ref());

    // Re-displaying is served from memory when the first load produced a list
    let from_cache = loader.cached().is_some();
    if let Some(again) = loader.load(&query).await {
        let source = if from_cache { "from cache" } else { "after a fresh fetch" };
        tracing::info!("Second load served {} earthquakes {}", again.len(), source);
    }

    Ok(())
}

fn print_earthquakes(earthquakes: Option<&Earthquakes>) {
    match earthquakes {
        None => println!("Earthquake data unavailable"),
        Some(list) if list.is_empty() => println!("No earthquakes found"),
        Some(list) => {
            for quake in list.iter() {
                println!(
                    "{:>4}  {:<16} {:<40} {}  {:>8}  {}",
                    quake.formatted_magnitude(),
                    quake.offset(),
                    quake.primary_location(),
                    quake.date(),
                    quake.time(),
                    quake.url()
                );
            }
        }
    }
}
