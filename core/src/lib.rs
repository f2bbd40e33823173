//! Core domain logic for Abacus.
//!
//! - [`calculator`]: the input state machine and request assembly
//! - [`history`]: bounded calculation history backed by a key-value store
//! - [`store`]: the key-value store seam with file and in-memory backends
//!
//! Everything here is synchronous. The engine crate owns the async call to
//! the calculation service and feeds results back in.

pub mod calculator;
pub mod history;
pub mod store;

pub use calculator::{Calculator, DEFAULT_OPERAND, InvalidOperandEdit, Phase, Selection};
pub use history::{HISTORY_KEY, History, HistoryBook, MAX_HISTORY_ENTRIES};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
