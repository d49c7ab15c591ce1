// src/config/mod.rs

//! Configuration loading and validation for eventexec.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Parse the short `exec <command> <args...>` form (`directive.rs`).
//! - Parse duration strings (`duration.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Resolve raw handlers into validated ones (`validate.rs`).

pub mod directive;
pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use directive::parse_directive;
pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, HandlerConfig, RawConfigFile, RawHandlerConfig};
