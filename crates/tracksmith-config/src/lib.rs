//! Configuration management for the tracksmith system.
//!
//! Handles loading and saving `tracksmith.yaml`, discovering the config file
//! by walking up the directory tree, and providing typed access to tracker
//! and run settings.

pub mod config;
pub mod discovery;

pub use config::{ConfigError, RunConfig, TrackerConfig, TracksmithConfig, load_config, save_config};
pub use discovery::{CONFIG_FILE_NAME, find_config_file};
