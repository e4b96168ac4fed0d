//! Memory pairs (workspace facade crate).
//!
//! Exposes `memory_pairs::{core, adapter, types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use memory_pairs_adapter as adapter;
pub use memory_pairs_core as core;
pub use memory_pairs_types as types;
