//! Build configuration: document, parser, interpolation, prefix merging
//!
//! The configuration is an INI-style document with a distinguished
//! `build` default section whose options are visible as fallbacks in
//! every other section, `${...}` value interpolation, and
//! `<prefix>_add_*`/`<prefix>_del_*` fragment merging for list-valued
//! options composed across layered config files.

pub mod defaults;
mod document;
mod error;
mod interpolate;
mod merge;
mod parser;

pub use document::{Config, ConfigSource, Section};
pub use error::ConfigError;
pub use merge::{fragment_prefixes, merge_option_prefix, resolve_fragments};
