// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod generator;
pub mod language;
pub mod runtime;
pub mod scoring;
pub mod stats;
pub mod transcript;
pub mod ui;
