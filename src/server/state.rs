use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{HarvardClient, UreqTransport};
use crate::config::{Config, ConfigError};
use crate::culture::CultureCache;
use crate::explorer::ExplorerHandle;
use crate::filters::{spawn_debouncer, DebouncerHandle, FilterSelection};
use crate::location::{Geocoder, NominatimGeocoder, PlaceResolver};

pub struct AppState {
    pub explorer: ExplorerHandle,
    pub filters: DebouncerHandle,
    pub client: HarvardClient,
    pub cultures: Mutex<CultureCache>,
    pub places: PlaceResolver,
}

impl AppState {
    /// Wire the explorer and the filter debouncer together. Needs a tokio runtime.
    pub fn new(
        client: HarvardClient,
        cultures: CultureCache,
        geocoder: Arc<dyn Geocoder>,
        debounce: Duration,
    ) -> Self {
        let explorer = ExplorerHandle::spawn(client.clone());
        let sink = explorer.clone();
        let filters = spawn_debouncer(debounce, FilterSelection::default(), move |applied| {
            sink.apply_filters(applied)
        });
        let places = PlaceResolver::new(geocoder).with_place_lookup(client.clone());

        Self {
            explorer,
            filters,
            client,
            cultures: Mutex::new(cultures),
            places,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let agent = config.http_agent();
        let client = HarvardClient::new(
            config.api_settings()?,
            Arc::new(UreqTransport::new(agent.clone())),
        );
        let cultures = CultureCache::load(config.culture_cache_path());
        let geocoder = Arc::new(NominatimGeocoder::new(agent, config.geocoder_url.clone()));
        Ok(Self::new(client, cultures, geocoder, config.debounce()))
    }
}
