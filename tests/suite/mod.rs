//! Integration test suite modules

mod persistence;
mod scenarios;
mod startup;
