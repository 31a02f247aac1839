//! Shared types, error model, and configuration for pressmill.
//!
//! This crate is the foundation depended on by all other pressmill crates.
//! It provides:
//! - [`PressmillError`] — the unified error type
//! - Domain types ([`Pivot`], [`InputFile`], [`OutputKind`], [`RenderedArtifact`])
//! - Run parameters ([`Params`]) and configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod params;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{PressmillError, Result};
pub use params::Params;
pub use types::{
    ArtifactData, ArtifactFormat, InputFile, OutputKind, Pivot, PivotKey, RenderedArtifact, RunId,
};
