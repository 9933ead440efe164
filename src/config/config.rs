use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin that a relative api base (like `/api`) is resolved against
    pub origin: String,

    /// Per-request timeout; unset leaves it to the HTTP client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Heading shown above the form
    pub title: String,

    /// Use Unicode glyphs in status markers
    pub use_glyphs: bool,

    /// Show the api base footer
    pub show_footer: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "SaferWatch URL Shortener".to_string(),
            use_glyphs: true,
            show_footer: true,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl DisplayConfig {
    pub fn success_marker(&self) -> &'static str {
        if self.use_glyphs {
            "✅"
        } else {
            "[OK]"
        }
    }

    pub fn error_marker(&self) -> &'static str {
        if self.use_glyphs {
            "❌"
        } else {
            "[X]"
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load config from `path`, writing the defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("shorten-cli").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# shorten-cli configuration
# Location: ~/.config/shorten-cli/config.toml (Linux)
#           ~/Library/Application Support/shorten-cli/config.toml (macOS)
#           %APPDATA%\shorten-cli\config.toml (Windows)

[server]
# A relative api base (the default is /api) is resolved against this origin.
# An api base baked in at build time with SHORTEN_API_BASE=https://... wins.
origin = "http://localhost:8000"

# Give up on a request after this many seconds (default: no timeout)
# request_timeout_secs = 10

[display]
# Heading shown above the form
title = "SaferWatch URL Shortener"

# Use Unicode glyphs for status markers; false for ASCII only
use_glyphs = true

# Show the api base in the footer
show_footer = true
"#
        .to_string()
    }
}
