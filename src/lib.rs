//! Client-side orchestration for the ODIADEV text-to-speech and voice-cloning service.
//!
//! - [`core::transport`]: one typed HTTP call per operation
//! - [`core::session`]: request lifecycle per view, with duplicate-submit protection
//! - [`core::audio`]: playable audio handles, released exactly once
//! - [`core::validation`]: client-side checks for TTS text and voice-clone uploads

pub mod config;
pub mod core;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::{ClientConfig, ConfigError};
pub use core::*;
