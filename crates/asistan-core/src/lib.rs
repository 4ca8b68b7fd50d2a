//! Error taxonomy and environment configuration for the assistant backend.

pub mod config;
pub mod error;

pub use config::AsistanConfig;
pub use error::{Error, Result};
