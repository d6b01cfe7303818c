//! Page command implementation.

use crate::demo;
use ajane_core::PanelConfig;
use ajane_server::{render_page, ServerConfig};

/// Runs the page command.
pub fn run(panel_config: PanelConfig, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (panel, _) = demo::build(panel_config)?;
    print!("{}", render_page(&panel, config));
    Ok(())
}
