pub mod core;
pub mod decorate;

// Re-export the main types for convenience
pub use core::Corpus;
