//! Command-line host for tender catalog reconciliation.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
