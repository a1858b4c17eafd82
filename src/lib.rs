//! Local task tracker backed by a single JSON file.
//!
//! All state lives in the file: every operation loads the full task list,
//! mutates it in memory, and writes it back.

pub mod store;
pub mod task;
