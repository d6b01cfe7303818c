//! Serve command implementation.

use crate::demo;
use ajane_core::PanelConfig;
use ajane_server::{PanelServer, ServerConfig};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Runs the serve command.
pub fn run(panel_config: PanelConfig, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (panel, ids) = demo::build(panel_config)?;
    let server = PanelServer::new(panel, config).with_hook(move |panel| ids.react(panel));
    let panel = server.panel();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        // The ticker publishes one batch per second.
        let started = Instant::now();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                let mut panel = panel.lock();
                match ids.tick(&mut panel, started.elapsed().as_secs()) {
                    Ok(()) => {
                        panel.commit();
                    }
                    Err(error) => warn!(%error, "ticker update failed"),
                }
            }
        });

        let shutdown = async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutting down");
        };
        let result = server.run(shutdown).await;
        ticker.abort();
        result
    })?;

    Ok(())
}
