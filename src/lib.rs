//! Debian ostree image builder - configuration core
//!
//! This crate implements the configuration layer of the builder: an
//! INI-style document with variable interpolation, layered multi-file
//! loading, and prefix add/del merging for list-valued options.

pub mod config;
pub mod error;
pub mod fsutil;

pub use config::{Config, ConfigError, ConfigSource, Section};
pub use error::BuildError;
