//! Utility functions and helpers
//!
//! Paths, logging, and the poll-driven copy reset timer.

pub mod app_paths;
pub mod copy_timer;
pub mod dual_logging;
pub mod logging;
