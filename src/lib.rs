//! Terminal puyo puzzle (workspace facade crate).
//!
//! Exposes the member crates as `puyo_tui::{core,input,term,types}` so the
//! binary, the integration tests and the benchmarks share one import path.

pub use puyo_core as core;
pub use puyo_input as input;
pub use puyo_term as term;
pub use puyo_types as types;
