//! # artist-relay common library
//!
//! Shared code for the relay binaries:
//! - Error and result types
//! - Bootstrap configuration (TOML file, overrides, compiled defaults)

pub mod config;
pub mod error;

pub use error::{Error, Result};
