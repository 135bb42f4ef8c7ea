//! Fitness test scoring: reference tables, per-event scorers, composite
//! scores, and locally stored history and settings.

pub mod config;
pub mod history;
pub mod output;
pub mod prompt;
pub mod scoring;
pub mod settings;
pub mod store;
