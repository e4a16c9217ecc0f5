// ── Sync engine ──
//
// Controllers that own request lifecycles: the periodic poller, the
// detail-fetching selection, and the acknowledgment coordinator.

pub mod mutation;
pub mod polling;
pub mod selection;

pub use mutation::{AckOutcome, MutationCoordinator};
pub use polling::{FetchFuture, PollOptions, PollState, PollingController, RefreshHandle};
pub use selection::{SelectionController, SelectionState};
