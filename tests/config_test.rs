use anyhow::Result;
use shorten_cli::config::{ApiEndpoint, Config};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_config_is_created_with_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("shorten-cli").join("config.toml");

    let config = Config::load_from(&path)?;
    assert!(path.exists());
    assert_eq!(config.server.origin, "http://localhost:8000");

    let reloaded = Config::load_from(&path)?;
    assert_eq!(reloaded.server.origin, config.server.origin);
    assert_eq!(reloaded.display.title, config.display.title);
    Ok(())
}

#[test]
fn test_saved_origin_drives_endpoint() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.server.origin = "https://safer.watch".to_string();
    config.server.request_timeout_secs = Some(10);
    config.save_to(&path)?;

    let loaded = Config::load_from(&path)?;
    assert_eq!(loaded.server.request_timeout_secs, Some(10));

    let endpoint = ApiEndpoint::resolve("/api", &loaded.server.origin)?;
    assert_eq!(endpoint.base_url, "https://safer.watch/api");
    Ok(())
}

#[test]
fn test_commented_template_loads() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");
    fs::write(&path, Config::create_default_with_comments())?;

    let config = Config::load_from(&path)?;
    assert!(config.display.show_footer);
    assert_eq!(config.server.request_timeout(), None);
    Ok(())
}

#[test]
fn test_malformed_config_is_an_error() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server\norigin = ")?;

    assert!(Config::load_from(&path).is_err());
    Ok(())
}
