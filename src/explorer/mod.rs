//! Explorer: the artwork list state, its reducer and the task that owns it.

pub mod actor;
pub mod state;

pub use actor::ExplorerHandle;
pub use state::{update, Effect, ExplorerState, LoadState, Msg};
