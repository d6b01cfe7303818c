//! Request handlers for the panel endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::markup::write_page;
use crate::transport::FormTransport;
use ajane_core::{Panel, SyncOutcome};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Server logic run once per update, after the client's fields and button
/// callbacks were applied and before the panel commits.
pub type ReactionHook = Arc<dyn Fn(&mut Panel) + Send + Sync>;

/// Handler for page and sync requests.
///
/// The panel is shared with the server program behind a mutex. A sync
/// request holds the lock for its whole apply, callback, hook, commit and
/// diff sequence, so no other request or server-side mutation can observe
/// a half-applied update.
#[derive(Clone)]
pub struct PanelHandler {
    panel: Arc<Mutex<Panel>>,
    config: Arc<ServerConfig>,
    hook: Option<ReactionHook>,
}

impl PanelHandler {
    /// Creates a handler for a shared panel.
    pub fn new(panel: Arc<Mutex<Panel>>, config: ServerConfig) -> Self {
        Self {
            panel,
            config: Arc::new(config),
            hook: None,
        }
    }

    /// Installs the reaction hook.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Panel) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// The shared panel.
    pub fn panel(&self) -> &Arc<Mutex<Panel>> {
        &self.panel
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handles a page request.
    pub fn handle_page(&self) -> ServerResult<String> {
        let panel = self.panel.lock();
        debug!(revision = %panel.revision(), "serving page");
        let mut page = String::with_capacity(4096);
        write_page(&mut page, &panel, &self.config)
            .map_err(|_| ServerError::Internal("failed to render page".into()))?;
        Ok(page)
    }

    /// Handles a sync request carrying the decoded form `fields`.
    pub fn handle_sync(
        &self,
        fields: HashMap<String, String>,
    ) -> ServerResult<(SyncOutcome, FormTransport)> {
        let mut transport = FormTransport::new(fields);
        let outcome = {
            let mut panel = self.panel.lock();
            let hook = self.hook.as_deref();
            panel.handle_request(&mut transport, |panel| {
                if let Some(hook) = hook {
                    hook(panel);
                }
            })?
        };
        debug!(?outcome, bytes = transport.body().len(), "sync handled");
        Ok((outcome, transport))
    }
}

impl std::fmt::Debug for PanelHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelHandler")
            .field("config", &self.config)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajane_core::{PanelConfig, Revision};

    fn handler() -> PanelHandler {
        let mut builder = Panel::builder(PanelConfig::default());
        let celsius = builder.text_input("celsius", 6).unwrap();
        let fahrenheit = builder.span("fahrenheit", "").unwrap();
        let panel = builder.build(&[celsius, fahrenheit]).unwrap();

        PanelHandler::new(Arc::new(Mutex::new(panel)), ServerConfig::default()).with_hook(
            move |panel| {
                let converted = panel
                    .text(celsius)
                    .ok()
                    .and_then(|text| text.trim().parse::<f64>().ok())
                    .map(|c| format!("{:.1}", c * 9.0 / 5.0 + 32.0))
                    .unwrap_or_default();
                let _ = panel.set_text(fahrenheit, &converted);
            },
        )
    }

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn hook_derives_values() {
        let handler = handler();
        let (outcome, transport) = handler
            .handle_sync(fields(&[("revision", "1"), ("celsius", "100")]))
            .unwrap();

        assert_eq!(outcome.revision(), Revision::new(2));
        assert_eq!(
            std::str::from_utf8(transport.body()).unwrap(),
            r#"{"ArduJAXrevision":2,"celsius":{"value":"100"},"fahrenheit":{"innerHTML":"212.0"}}"#
        );
    }

    #[test]
    fn poll_skips_hook() {
        let handler = handler();
        let (outcome, _) = handler.handle_sync(fields(&[("revision", "1")])).unwrap();
        assert!(!outcome.is_update());
        assert_eq!(handler.panel().lock().revision(), Revision::new(1));
    }

    #[test]
    fn page_embeds_revision() {
        let handler = handler();
        let page = handler.handle_page().unwrap();
        assert!(page.contains("revision: 1"));
        assert!(page.contains("id=\"celsius\""));
    }
}
