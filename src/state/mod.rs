//! Application state
//!
//! Typed slices owned by the composition root, the local key/value store
//! they persist into, and the sequencer that keeps only the newest response
//! per page.

pub mod sequencer;
pub mod slices;
pub mod storage;

pub use sequencer::{Outcome, RequestSequencer, Ticket};
pub use slices::{
    AppState, Language, Persisted, RolePlaySlice, SolutionSlice, Theme, TokenMapSlice, UiSlice,
};
pub use storage::LocalStore;
