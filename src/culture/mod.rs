//! Culture facet options: the 7-day cache and the catalog that consults it.

pub mod cache;

pub use cache::CultureCache;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::HarvardClient;
use crate::filters::ANY;

/// Culture picker options: "Any" followed by the sorted culture names.
pub fn load_cultures(client: &HarvardClient, cache: &mut CultureCache) -> Vec<String> {
    load_cultures_at(client, cache, Utc::now())
}

/// Served from the cache while fresh; otherwise fetched and re-cached. A
/// failed fetch falls back to whatever stale list the cache still holds.
pub fn load_cultures_at(
    client: &HarvardClient,
    cache: &mut CultureCache,
    now: DateTime<Utc>,
) -> Vec<String> {
    let fresh = if cache.should_fetch_at(now) { None } else { cache.get() };

    let names = match fresh {
        Some(names) => names,
        None => match client.fetch_cultures() {
            Ok(mut names) => {
                names.retain(|n| !n.trim().is_empty() && n != ANY);
                names.sort();
                names.dedup();
                info!(count = names.len(), "fetched culture list");
                cache.put_at(&names, now);
                names
            }
            Err(e) => {
                warn!(error = %e, "culture fetch failed, using cached list");
                cache.get().unwrap_or_default()
            }
        },
    };

    std::iter::once(ANY.to_string()).chain(names).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{scripted_client, ScriptedTransport};
    use crate::api::ApiError;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    const CULTURES: &str = r#"{
        "info": {"totalrecords": 3},
        "records": [{"id": 1, "name": "Roman"}, {"id": 2, "name": "Aztec"}, {"id": 3, "name": "Greek"}]
    }"#;

    fn cache(dir: &TempDir) -> CultureCache {
        CultureCache::load(dir.path().join("cultures.json"))
    }

    #[test]
    fn test_fetches_sorts_and_caches() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache(&dir);
        let transport = ScriptedTransport::new(vec![Ok(CULTURES.into())]);
        let client = scripted_client(transport.clone());
        let now = Utc.with_ymd_and_hms(2024, 9, 21, 0, 0, 0).unwrap();

        let options = load_cultures_at(&client, &mut cache, now);
        assert_eq!(options, vec!["Any", "Aztec", "Greek", "Roman"]);
        assert_eq!(cache.get().unwrap(), vec!["Aztec", "Greek", "Roman"]);

        // Second call within the TTL is served from cache.
        let options = load_cultures_at(&client, &mut cache, now + Duration::days(3));
        assert_eq!(options.len(), 4);
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_refetches_after_ttl() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache(&dir);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        cache.put_at(&["Old".to_string()], t0);

        let transport = ScriptedTransport::new(vec![Ok(CULTURES.into())]);
        let client = scripted_client(transport.clone());
        let options = load_cultures_at(&client, &mut cache, t0 + Duration::days(8));

        assert_eq!(transport.calls(), 1);
        assert_eq!(options, vec!["Any", "Aztec", "Greek", "Roman"]);
        assert!(!cache.should_fetch_at(t0 + Duration::days(8)));
    }

    #[test]
    fn test_failure_falls_back_to_stale_list() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache(&dir);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        cache.put_at(&["Stale".to_string()], t0);

        let transport = ScriptedTransport::new(vec![Err(ApiError::Network("down".into()))]);
        let client = scripted_client(transport);
        let options = load_cultures_at(&client, &mut cache, t0 + Duration::days(30));
        assert_eq!(options, vec!["Any", "Stale"]);
    }

    #[test]
    fn test_failure_with_empty_cache_still_offers_any() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache(&dir);
        let transport = ScriptedTransport::new(vec![Err(ApiError::Network("down".into()))]);
        let options = load_cultures(&scripted_client(transport), &mut cache);
        assert_eq!(options, vec!["Any"]);
        assert!(cache.should_fetch());
    }
}
