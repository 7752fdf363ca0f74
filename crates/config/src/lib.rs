//! Configuration loading for the chatrelay proxy.
//!
//! Uses figment to layer built-in defaults, an optional YAML file, and
//! `CHATRELAY_`-prefixed environment variables.

pub mod schema;

pub use schema::{Config, CorsConfig, LogConfig, LogFormat, ProviderConfig};
