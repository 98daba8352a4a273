//! CLI command implementations

pub mod completions;
pub mod config;
pub mod horse;
pub mod io;
pub mod owner;
pub mod seed;
