//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "focusbrew")]
#[command(about = "A Pomodoro focus timer with an HTTP session-recording backend")]
#[command(version)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the session recorder backend
    Serve {
        /// Port to bind the server to
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Path to the SQLite session store
        #[arg(long, default_value = "db.sqlite")]
        db_path: PathBuf,
    },

    /// Run the interactive Pomodoro timer in the terminal
    Timer {
        /// Base URL of the session recorder backend
        #[arg(short, long, default_value = "http://localhost:5000")]
        server: String,
    },
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
