//! Shared infrastructure utilities for Abacus.
//!
//! - **`atomic_write`**: crash-safe file persistence (temp file + rename), used
//!   by the file-backed history store.

pub mod atomic_write;

pub use atomic_write::{FileSyncPolicy, atomic_write, atomic_write_with_policy};
