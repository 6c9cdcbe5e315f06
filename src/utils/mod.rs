//! Utility helpers for the distribution engine.
//! Currently only the process-wide data parallelism switch.

mod parallel;

pub use parallel::{parallelism_enabled, preferred_chunk_size, set_parallelism, ParallelismGuard};
