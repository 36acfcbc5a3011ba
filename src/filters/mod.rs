//! Filter state: facet selection, applied snapshots and the debouncer.

pub mod debounce;
pub mod selection;

pub use debounce::{spawn_debouncer, DebouncerHandle};
pub use selection::{AppliedFilters, FilterEvent, FilterSelection, ANY, CENTURIES, CLASSIFICATIONS};
