pub mod api_client;
pub mod clipboard;
pub mod config;
pub mod errors;
pub mod shortener;
pub mod tui_app;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_support;
