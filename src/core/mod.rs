//! Core components of the fusion engine.
//!
//! This module contains configuration management and error handling shared
//! by every pipeline stage.

pub mod config;
pub mod errors;

pub use config::FusionConfig;
pub use errors::FusionError;
