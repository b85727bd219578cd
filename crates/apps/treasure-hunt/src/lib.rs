//! Treasure Hunt application
//!
//! Wires the engine crates into a playable experience:
//!
//! - [`app`]: [`TreasureHunt`], the frame renderer, trigger and sensor listener
//! - [`config`]: TOML configuration with defaults for every setting
//! - [`host`]: Headless host that drives a renderer without a display
//! - [`resources`]: Text asset loading for shader sources

pub mod app;
pub mod config;
pub mod host;
pub mod resources;

pub use app::{TreasureHunt, TriggerOutcome};
pub use config::{load_config, ConfigError, HuntConfig};
pub use host::{CountingSink, HeadlessHost, HostConfig, RunSummary};
pub use resources::{read_text_resource, ShaderSources};
