//! Configuration module
//!
//! Api base resolution, the TOML config file, and the form's key map.

pub mod api_base;
pub mod config;
pub mod key_bindings;

pub use api_base::{configured_api_base, ApiEndpoint};
pub use config::Config;
