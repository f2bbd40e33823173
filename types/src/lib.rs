//! Core domain types for Abacus.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod format;
mod history;
mod operator;
mod options;
mod wire;

pub use format::{format_number, format_value, number_to_operand, parse_operand};
pub use history::HistoryEntry;
pub use operator::{Operator, OperatorKind};
pub use options::{KeypadMode, UiOptions};
pub use wire::{CalculationRequest, CalculationResponse, HealthStatus, MalformedResponse};
