//! # Restwell Common Library
//!
//! Shared code for the Restwell backend:
//! - Persisted document models (profiles, consents, analyses)
//! - Error types
//! - Configuration resolution
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
