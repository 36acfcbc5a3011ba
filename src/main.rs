use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use art_explorer::config::Config;
use art_explorer::culture::load_cultures;
use art_explorer::explorer::LoadState;
use art_explorer::filters::{AppliedFilters, ANY};
use art_explorer::location::{GeocodeStatus, PlaceResolver};
use art_explorer::server::{self, AppState};

/// Art Explorer: browse the Harvard Art Museums collection.
///
/// Prints artworks, culture options or geocoding results as JSON,
/// or serves the explorer as a local JSON backend.
///
/// Examples:
///   artx --culture Japanese --classification Prints
///   artx --century 17th --random
///   artx --cultures
///   artx --geocode "Boston, Massachusetts"
///   artx --serve --port 3070
#[derive(Parser)]
#[command(name = "artx", version, about, long_about = None)]
struct Cli {
    /// Culture facet (default: Any).
    #[arg(long, default_value = ANY)]
    culture: String,

    /// Century facet, e.g. 17th (default: Any).
    #[arg(long, default_value = ANY)]
    century: String,

    /// Classification facet, e.g. Prints (default: Any).
    #[arg(long, default_value = ANY)]
    classification: String,

    /// Ask the API for a random ordering.
    #[arg(long)]
    random: bool,

    /// List culture options instead of artworks.
    #[arg(long, conflicts_with_all = ["geocode", "serve"])]
    cultures: bool,

    /// Resolve a place name to a coordinate.
    #[arg(long, value_name = "PLACE", conflicts_with = "serve")]
    geocode: Option<String>,

    /// Run the local JSON backend.
    #[arg(long)]
    serve: bool,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Config file (default: ~/.config/art-explorer/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// API key; overrides config file and ARTX_API_KEY.
    #[arg(long, env = "ARTX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "art_explorer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(key) = cli.api_key.clone() {
        config.api_key = Some(key);
    }
    if let Some(host) = cli.host.clone() {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Geocoding needs no museum API key.
    if let Some(place) = cli.geocode {
        let status = PlaceResolver::from_config(&config).resolve_async(place).await;
        println!("{}", serde_json::to_string_pretty(&status)?);
        if matches!(status, GeocodeStatus::NotFound { .. }) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let state = Arc::new(AppState::from_config(&config)?);

    if cli.serve {
        info!(host = %config.host, port = config.port, "starting server");
        return server::start(&config.host, config.port, state)
            .await
            .with_context(|| format!("Server on {}:{} failed", config.host, config.port));
    }

    if cli.cultures {
        let task_state = state.clone();
        let names = tokio::task::spawn_blocking(move || {
            let mut cache = task_state
                .cultures
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            load_cultures(&task_state.client, &mut cache)
        })
        .await
        .context("Culture task failed")?;
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    let filters = AppliedFilters::new(&cli.culture, &cli.century, &cli.classification, cli.random);
    info!(?filters, "fetching artworks");
    state.explorer.apply_filters(filters);
    let result = state.explorer.wait_settled().await;

    match result.load() {
        LoadState::Loaded { .. } => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        LoadState::Failed { message } => anyhow::bail!("Error: {}", message),
        LoadState::Idle | LoadState::Loading => anyhow::bail!("Explorer stopped before loading"),
    }
}
