//! Command-line arguments

use autoreload_core::config::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_HOST, DEFAULT_PATTERN, DEFAULT_PORT,
};
use autoreload_core::{Config, WatchedPath};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Watches paths for changes and notifies websocket clients so they can reload
#[derive(Parser, Debug)]
#[command(name = "autoreload")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paths to watch (default: current directory)
    #[arg(value_name = "RELOAD_PATHS")]
    pub reload_paths: Vec<PathBuf>,

    /// Glob patterns to watch (default: *.html; no value: every file)
    #[arg(long = "pattern", value_name = "GLOB", num_args = 0.., action = ArgAction::Append)]
    pub patterns: Option<Vec<String>>,

    /// Hosts to bind the websocket server to (default: localhost; no value: all interfaces)
    #[arg(long = "host", value_name = "HOST", num_args = 0.., action = ArgAction::Append)]
    pub hosts: Option<Vec<String>>,

    /// Port for the websocket server (1024 or higher)
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Minimum gap between two notifications, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Watch subdirectories too
    #[arg(long)]
    pub recursive: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the browser client script for --port and exit
    #[arg(long)]
    pub print_client: bool,
}

impl Args {
    /// Resolve defaults into a runtime configuration
    pub fn to_config(&self) -> Config {
        let patterns = self
            .patterns
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_PATTERN.to_string()]);

        let paths = if self.reload_paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.reload_paths.clone()
        };

        Config {
            watched: paths
                .into_iter()
                .map(|path| WatchedPath::new(path, patterns.clone()))
                .collect(),
            hosts: self
                .hosts
                .clone()
                .unwrap_or_else(|| vec![DEFAULT_HOST.to_string()]),
            port: self.port,
            debounce: Duration::from_millis(self.debounce_ms),
            recursive: self.recursive,
        }
    }
}
