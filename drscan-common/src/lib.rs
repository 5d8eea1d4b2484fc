//! # drscan common library
//!
//! Shared code for the drscan workspace:
//! - Error and result types
//! - Configuration loading (CLI → ENV → TOML → compiled default)
//! - Event bus for state changes and user notifications

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
