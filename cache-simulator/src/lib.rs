// Trace simulator library for the hybrid-cache engine

pub mod config;
pub mod generator;
pub mod input;
pub mod logging;
pub mod models;
pub mod runner;
pub mod stats;
