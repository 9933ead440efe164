use anyhow::{anyhow, Result};
use url::Url;

/// Used when no override was supplied at build time
pub const DEFAULT_API_BASE: &str = "/api";

/// Build-time override, e.g. `SHORTEN_API_BASE=https://safer.watch/api cargo build`
const BUILD_API_BASE: Option<&str> = option_env!("SHORTEN_API_BASE");

/// The api base this binary was built with
pub fn configured_api_base() -> &'static str {
    resolve_api_base(BUILD_API_BASE)
}

/// An override wins unless it is missing or blank
pub fn resolve_api_base(override_value: Option<&str>) -> &str {
    match override_value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_API_BASE,
    }
}

/// Where requests actually go.
///
/// An absolute http(s) api base is used as-is. Anything else is a path that
/// is resolved against `origin`, the same way a browser resolves `/api`
/// against the page it was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    /// The api base as configured, shown in the footer
    pub api_base: String,
    /// Absolute base URL without a trailing slash
    pub base_url: String,
}

impl ApiEndpoint {
    pub fn resolve(api_base: &str, origin: &str) -> Result<Self> {
        let base_url = match Url::parse(api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                return Err(anyhow!(
                    "Unsupported api base scheme '{}' in {}",
                    url.scheme(),
                    api_base
                ))
            }
            Err(_) => {
                let origin = Url::parse(origin)
                    .map_err(|e| anyhow!("Invalid server origin '{}': {}", origin, e))?;
                origin
                    .join(api_base)
                    .map_err(|e| anyhow!("Cannot resolve api base '{}': {}", api_base, e))?
            }
        };

        Ok(Self {
            api_base: api_base.to_string(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }
}
