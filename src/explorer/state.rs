use serde::Serialize;
use tracing::debug;

use crate::api::{ApiError, Artwork, ArtworkPage};
use crate::filters::AppliedFilters;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded { artworks: Vec<Artwork>, total: u32 },
    Failed { message: String },
}

/// Everything the explorer screen shows. Owned by the explorer task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorerState {
    applied: Option<AppliedFilters>,
    request_seq: u64,
    load: LoadState,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            applied: None,
            request_seq: 0,
            load: LoadState::Idle,
        }
    }
}

impl ExplorerState {
    pub fn applied(&self) -> Option<&AppliedFilters> {
        self.applied.as_ref()
    }

    pub fn load(&self) -> &LoadState {
        &self.load
    }

    pub fn request_seq(&self) -> u64 {
        self.request_seq
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.load, LoadState::Loaded { .. } | LoadState::Failed { .. })
    }

    pub fn artworks(&self) -> &[Artwork] {
        match &self.load {
            LoadState::Loaded { artworks, .. } => artworks,
            _ => &[],
        }
    }

    pub fn artwork(&self, id: i64) -> Option<&Artwork> {
        self.artworks().iter().find(|a| a.id == id)
    }

    fn begin_fetch(&mut self, filters: AppliedFilters) -> Effect {
        self.request_seq += 1;
        self.applied = Some(filters.clone());
        self.load = LoadState::Loading;
        Effect::Fetch {
            seq: self.request_seq,
            filters,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    /// First appearance of the list: fetch with the current (or default) filters.
    Start,
    FiltersApplied(AppliedFilters),
    /// Re-run the last fetch regardless of the equality gate.
    Refresh,
    FetchFinished {
        seq: u64,
        result: Result<ArtworkPage, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { seq: u64, filters: AppliedFilters },
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ExplorerState, msg: Msg) -> (ExplorerState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.load == LoadState::Idle {
                let filters = state.applied.clone().unwrap_or_default();
                vec![state.begin_fetch(filters)]
            } else {
                Vec::new()
            }
        }
        Msg::FiltersApplied(filters) => {
            let unchanged = state.applied.as_ref() == Some(&filters);
            let in_good_standing = matches!(
                state.load,
                LoadState::Loading | LoadState::Loaded { .. }
            );
            if unchanged && in_good_standing {
                debug!(?filters, "filters unchanged, skipping fetch");
                Vec::new()
            } else {
                vec![state.begin_fetch(filters)]
            }
        }
        Msg::Refresh => {
            let filters = state.applied.clone().unwrap_or_default();
            vec![state.begin_fetch(filters)]
        }
        Msg::FetchFinished { seq, result } => {
            if seq != state.request_seq {
                debug!(seq, latest = state.request_seq, "dropping superseded fetch result");
                return (state, Vec::new());
            }
            state.load = match result {
                Ok(page) => LoadState::Loaded {
                    total: page.info.totalrecords,
                    artworks: page.records,
                },
                Err(e) => LoadState::Failed {
                    message: e.to_string(),
                },
            };
            Vec::new()
        }
    };

    (state, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PageInfo;

    fn page(titles: &[&str]) -> ArtworkPage {
        ArtworkPage {
            info: PageInfo {
                totalrecords: 500,
                ..PageInfo::default()
            },
            records: titles
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    serde_json::from_value(serde_json::json!({
                        "id": i as i64 + 1,
                        "title": t,
                        "primaryimageurl": "https://img.test/x.jpg",
                    }))
                    .unwrap()
                })
                .collect(),
            skipped: 0,
        }
    }

    fn chinese() -> AppliedFilters {
        AppliedFilters::new("Chinese", "Any", "Any", false)
    }

    #[test]
    fn test_start_fetches_defaults() {
        let (state, effects) = update(ExplorerState::default(), Msg::Start);
        assert_eq!(state.load, LoadState::Loading);
        assert_eq!(
            effects,
            vec![Effect::Fetch { seq: 1, filters: AppliedFilters::default() }]
        );

        let (_, effects) = update(state, Msg::Start);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_success_loads_artworks() {
        let (state, _) = update(ExplorerState::default(), Msg::FiltersApplied(chinese()));
        let (state, effects) = update(
            state,
            Msg::FetchFinished { seq: 1, result: Ok(page(&["Vase", "Scroll"])) },
        );
        assert!(effects.is_empty());
        assert!(state.is_settled());
        assert_eq!(state.artworks().len(), 2);
        assert_eq!(state.artwork(2).unwrap().title, "Scroll");
        assert!(matches!(state.load(), LoadState::Loaded { total: 500, .. }));
    }

    #[test]
    fn test_failure_surfaces_message() {
        let (state, _) = update(ExplorerState::default(), Msg::Start);
        let err = ApiError::Exhausted {
            attempts: 3,
            last: Box::new(ApiError::Network("offline".into())),
        };
        let (state, _) = update(state, Msg::FetchFinished { seq: 1, result: Err(err) });
        match state.load() {
            LoadState::Failed { message } => {
                assert_eq!(message, "Failed after 3 attempts: Network error: offline")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(state.artworks().is_empty());
    }

    #[test]
    fn test_unchanged_filters_do_not_refetch() {
        let (state, _) = update(ExplorerState::default(), Msg::FiltersApplied(chinese()));
        let (state, effects) = update(state, Msg::FiltersApplied(chinese()));
        assert!(effects.is_empty());
        assert_eq!(state.request_seq(), 1);

        let (state, _) = update(state, Msg::FetchFinished { seq: 1, result: Ok(page(&["A"])) });
        let (_, effects) = update(state, Msg::FiltersApplied(chinese()));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_unchanged_filters_retry_after_failure() {
        let (state, _) = update(ExplorerState::default(), Msg::FiltersApplied(chinese()));
        let (state, _) = update(
            state,
            Msg::FetchFinished { seq: 1, result: Err(ApiError::Network("x".into())) },
        );
        let (state, effects) = update(state, Msg::FiltersApplied(chinese()));
        assert_eq!(effects, vec![Effect::Fetch { seq: 2, filters: chinese() }]);
        assert_eq!(state.load, LoadState::Loading);
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let (state, _) = update(ExplorerState::default(), Msg::FiltersApplied(chinese()));
        let (state, _) = update(state, Msg::FiltersApplied(AppliedFilters::default()));
        assert_eq!(state.request_seq(), 2);

        // Newer request lands first.
        let (state, _) = update(state, Msg::FetchFinished { seq: 2, result: Ok(page(&["New"])) });
        // Late completion of the superseded request must not overwrite it.
        let (state, _) = update(state, Msg::FetchFinished { seq: 1, result: Ok(page(&["Old"])) });

        assert_eq!(state.artworks()[0].title, "New");
        assert_eq!(state.applied(), Some(&AppliedFilters::default()));
    }

    #[test]
    fn test_refresh_bypasses_gate() {
        let (state, _) = update(ExplorerState::default(), Msg::FiltersApplied(chinese()));
        let (state, _) = update(state, Msg::FetchFinished { seq: 1, result: Ok(page(&["A"])) });
        let (state, effects) = update(state, Msg::Refresh);
        assert_eq!(effects, vec![Effect::Fetch { seq: 2, filters: chinese() }]);
        assert_eq!(state.load, LoadState::Loading);
    }

    #[test]
    fn test_view_serializes_with_status_tag() {
        let (state, _) = update(ExplorerState::default(), Msg::Start);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["load"]["status"], "loading");
        assert_eq!(json["applied"]["culture"], "Any");
    }
}
