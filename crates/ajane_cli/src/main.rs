//! Ajane CLI
//!
//! Demo server and diagnostic tools for Ajane control panels.
//!
//! # Commands
//!
//! - `serve` - Serve the demo panel over HTTP
//! - `dump` - Print the diff payload of the demo panel
//! - `page` - Print the page markup of the demo panel

mod commands;
mod demo;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Ajane control panel tools.
#[derive(Parser)]
#[command(name = "ajane")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Commit pending server-side changes on every poll
    #[arg(global = true, long)]
    commit_on_poll: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo panel over HTTP
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// URL path of the panel
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Page title
        #[arg(short, long, default_value = "Ajane demo")]
        title: String,

        /// Client poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        poll_ms: u64,
    },

    /// Print the diff payload of the demo panel
    Dump {
        /// Client baseline revision (omit to send everything)
        #[arg(short, long)]
        since: Option<u16>,

        /// Submit a field before diffing, as `id=value` (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Print the page markup of the demo panel
    Page {
        /// URL path of the panel
        #[arg(short, long, default_value = "/")]
        path: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let panel_config = ajane_core::PanelConfig::default().commit_on_poll(cli.commit_on_poll);

    match cli.command {
        Commands::Serve {
            bind,
            path,
            title,
            poll_ms,
        } => {
            let config = ajane_server::ServerConfig::new(bind)
                .with_path(path)
                .with_title(title)
                .with_poll_interval(std::time::Duration::from_millis(poll_ms));
            commands::serve::run(panel_config, config)?;
        }
        Commands::Dump {
            since,
            fields,
            format,
        } => {
            commands::dump::run(panel_config, since, &fields, &format)?;
        }
        Commands::Page { path } => {
            let config = ajane_server::ServerConfig::default().with_path(path);
            commands::page::run(panel_config, &config)?;
        }
        Commands::Version => {
            println!("Ajane CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
