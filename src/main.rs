use shorten_cli::config::{configured_api_base, ApiEndpoint, Config};
use shorten_cli::tui_app::run_tui_app;
use shorten_cli::utils::dual_logging::get_dual_logger;
use shorten_cli::utils::logging::init_tracing_with_dual_logging;

fn print_help() {
    println!("shorten-cli - shorten URLs from the terminal");
    println!();
    println!("Usage:");
    println!("  shorten-cli [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --generate-config  Write a commented default config file");
    println!("  --help             Show this help");
    println!();
    println!("Api base: {}", configured_api_base());
}

fn generate_config() -> anyhow::Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Config::create_default_with_comments())?;
    println!("Configuration file created at: {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--generate-config") {
        return generate_config();
    }

    let log_buffer = init_tracing_with_dual_logging();

    let config = Config::load()?;
    let endpoint = ApiEndpoint::resolve(configured_api_base(), &config.server.origin)?;
    tracing::info!(
        target: "main",
        "Api base {} resolved to {}",
        endpoint.api_base,
        endpoint.base_url
    );

    let result = run_tui_app(&config, endpoint, log_buffer);

    if let Some(logger) = get_dual_logger() {
        logger.flush();
        if result.is_err() {
            eprintln!("Logs: {}", logger.log_path().display());
        }
    }

    result
}
