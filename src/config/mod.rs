//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating the TOML source registry.
//!
//! # Example
//!
//! ```no_run
//! use corpus_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sources.toml")).unwrap();
//! println!("Harvesting {} sources", config.sources.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, RobotsConfig, RobotsPolicy, SourceConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
