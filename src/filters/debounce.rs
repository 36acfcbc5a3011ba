//! Debounced merge of filter events into applied snapshots.
//!
//! Every event restarts a quiescence timer. When the timer expires the
//! current selection is handed to the sink as an [`AppliedFilters`]
//! snapshot. `FilterEvent::ApplyNow` skips the wait.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, trace};

use super::selection::{AppliedFilters, FilterEvent, FilterSelection};

/// Cloneable front door to a running debouncer task.
#[derive(Clone)]
pub struct DebouncerHandle {
    events: mpsc::UnboundedSender<FilterEvent>,
    selection: watch::Receiver<FilterSelection>,
}

impl DebouncerHandle {
    /// Queue an event. Returns false once the debouncer has stopped.
    pub fn send(&self, event: FilterEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// The live (not yet applied) selection.
    pub fn selection(&self) -> FilterSelection {
        self.selection.borrow().clone()
    }
}

/// Spawn the debouncer on the current tokio runtime.
pub fn spawn_debouncer<F>(window: Duration, initial: FilterSelection, sink: F) -> DebouncerHandle
where
    F: Fn(AppliedFilters) + Send + 'static,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (selection_tx, selection_rx) = watch::channel(initial.clone());
    tokio::spawn(run(window, initial, events_rx, selection_tx, sink));
    DebouncerHandle {
        events: events_tx,
        selection: selection_rx,
    }
}

async fn run<F>(
    window: Duration,
    mut selection: FilterSelection,
    mut events: mpsc::UnboundedReceiver<FilterEvent>,
    selection_tx: watch::Sender<FilterSelection>,
    sink: F,
) where
    F: Fn(AppliedFilters),
{
    let mut deadline: Option<Instant> = None;

    loop {
        let event = match deadline {
            Some(at) => tokio::select! {
                event = events.recv() => event,
                _ = tokio::time::sleep_until(at) => {
                    deadline = None;
                    emit(&selection, &sink);
                    continue;
                }
            },
            None => events.recv().await,
        };

        let Some(event) = event else {
            if deadline.is_some() {
                emit(&selection, &sink);
            }
            debug!("filter debouncer stopped");
            break;
        };

        if event == FilterEvent::ApplyNow {
            deadline = None;
            emit(&selection, &sink);
            continue;
        }

        trace!(?event, "filter event");
        if selection.apply(event) {
            selection_tx.send_replace(selection.clone());
        }
        deadline = Some(Instant::now() + window);
    }
}

fn emit<F: Fn(AppliedFilters)>(selection: &FilterSelection, sink: &F) {
    let snapshot = selection.snapshot();
    debug!(?snapshot, "applying filters");
    sink(snapshot);
}
