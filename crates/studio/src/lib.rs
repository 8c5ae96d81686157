//! Storyloom studio — application state and the generation controller.
//!
//! State lives in one explicit struct (`StudioState`) and every mutation
//! goes through `StudioState::apply`, a pure function from old state plus
//! a `Command` to new state. The `Studio` controller owns the state, the
//! generation backend, and the policy for overlapping generation requests
//! (they are serialized, never interleaved).

pub mod controller;
pub mod state;

pub use controller::Studio;
pub use state::{Command, StudioState};
