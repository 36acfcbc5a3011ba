//! The explorer task: sole owner of [`ExplorerState`].
//!
//! Messages arrive on one channel, go through [`update`], and the resulting
//! effects run on the blocking pool. Fetch results come back as
//! `Msg::FetchFinished`, tagged with the request sequence number.

use tokio::sync::{mpsc, watch};
use tracing::{debug, error};

use super::state::{update, Effect, ExplorerState, Msg};
use crate::api::{ApiError, HarvardClient};
use crate::filters::AppliedFilters;

#[derive(Clone)]
pub struct ExplorerHandle {
    tx: mpsc::UnboundedSender<Msg>,
    view: watch::Receiver<ExplorerState>,
}

impl ExplorerHandle {
    /// Spawn the explorer task on the current tokio runtime.
    pub fn spawn(client: HarvardClient) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(ExplorerState::default());
        tokio::spawn(run(client, rx, tx.downgrade(), view_tx));
        Self { tx, view: view_rx }
    }

    pub fn start(&self) {
        self.send(Msg::Start);
    }

    pub fn apply_filters(&self, filters: AppliedFilters) {
        self.send(Msg::FiltersApplied(filters));
    }

    pub fn refresh(&self) {
        self.send(Msg::Refresh);
    }

    pub fn snapshot(&self) -> ExplorerState {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExplorerState> {
        self.view.clone()
    }

    /// Wait until the latest request has either loaded or failed.
    pub async fn wait_settled(&self) -> ExplorerState {
        let mut view = self.view.clone();
        let settled = view.wait_for(ExplorerState::is_settled).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    fn send(&self, msg: Msg) {
        if self.tx.send(msg).is_err() {
            error!("explorer task is gone");
        }
    }
}

async fn run(
    client: HarvardClient,
    mut rx: mpsc::UnboundedReceiver<Msg>,
    results: mpsc::WeakUnboundedSender<Msg>,
    view: watch::Sender<ExplorerState>,
) {
    let mut state = ExplorerState::default();

    while let Some(msg) = rx.recv().await {
        let (next, effects) = update(state, msg);
        state = next;
        view.send_replace(state.clone());

        for effect in effects {
            match effect {
                Effect::Fetch { seq, filters } => {
                    spawn_fetch(client.clone(), seq, filters, results.clone());
                }
            }
        }
    }
    debug!("explorer task stopped");
}

fn spawn_fetch(
    client: HarvardClient,
    seq: u64,
    filters: AppliedFilters,
    results: mpsc::WeakUnboundedSender<Msg>,
) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || client.fetch_artworks(&filters))
            .await
            .unwrap_or_else(|e| Err(ApiError::Network(format!("fetch task failed: {e}"))));

        match results.upgrade() {
            Some(tx) => {
                let _ = tx.send(Msg::FetchFinished { seq, result });
            }
            None => debug!(seq, "explorer closed before fetch finished"),
        }
    });
}
