//! Subcommand implementations. Each returns `anyhow::Result` with context
//! naming the file involved.

pub mod batch;
pub mod export;
pub mod generate;
pub mod showcase;
pub mod thumbnail;
