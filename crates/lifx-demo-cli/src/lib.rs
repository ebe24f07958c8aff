/*
[INPUT]:  Public API exports for the lifx-demo CLI crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod app;
pub mod cli;
pub mod config;

// Re-export main types for convenience
pub use app::App;
pub use cli::Cli;
pub use config::{CliConfig, Settings};
