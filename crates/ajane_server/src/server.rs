//! HTTP server for a panel.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::PanelHandler;
use ajane_core::Panel;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serves one panel on one path.
///
/// A GET returns the full page. A POST carries `revision=<baseline>` plus
/// changed widget fields as a form body and returns the JSON diff.
///
/// # Example
///
/// ```
/// use ajane_core::{Panel, PanelConfig};
/// use ajane_server::{PanelServer, ServerConfig};
///
/// let mut builder = Panel::builder(PanelConfig::default());
/// let status = builder.span("status", "idle").unwrap();
/// let panel = builder.build(&[status]).unwrap();
///
/// let server = PanelServer::new(panel, ServerConfig::default());
/// let _router = server.router();
///
/// // In a real program: server.run(shutdown_signal).await
/// ```
#[derive(Debug, Clone)]
pub struct PanelServer {
    handler: PanelHandler,
}

impl PanelServer {
    /// Creates a server owning `panel`.
    pub fn new(panel: Panel, config: ServerConfig) -> Self {
        Self::from_shared(Arc::new(Mutex::new(panel)), config)
    }

    /// Creates a server for a panel the program also mutates.
    pub fn from_shared(panel: Arc<Mutex<Panel>>, config: ServerConfig) -> Self {
        Self {
            handler: PanelHandler::new(panel, config),
        }
    }

    /// Installs the reaction hook run on every update.
    pub fn with_hook<F>(self, hook: F) -> Self
    where
        F: Fn(&mut Panel) + Send + Sync + 'static,
    {
        Self {
            handler: self.handler.with_hook(hook),
        }
    }

    /// The shared panel.
    pub fn panel(&self) -> Arc<Mutex<Panel>> {
        Arc::clone(self.handler.panel())
    }

    /// The request handler.
    pub fn handler(&self) -> &PanelHandler {
        &self.handler
    }

    /// Builds the router for the panel path.
    pub fn router(&self) -> Router {
        let path = self.handler.config().path.clone();
        Router::new()
            .route(&path, get(page).post(sync))
            .with_state(self.handler.clone())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.handler.config().bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(%addr, path = %self.handler.config().path, "serving panel");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .into_future()
            .await?;

        info!("panel server stopped");
        Ok(())
    }
}

async fn page(State(handler): State<PanelHandler>) -> ServerResult<Html<String>> {
    Ok(Html(handler.handle_page()?))
}

async fn sync(
    State(handler): State<PanelHandler>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> ServerResult<Response> {
    let Form(fields) =
        form.map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))?;
    let (_, transport) = handler.handle_sync(fields)?;
    Ok(transport.into_response())
}
