pub mod browser;
pub mod config;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod session;
pub mod stderr_buffer;
pub mod tui;
