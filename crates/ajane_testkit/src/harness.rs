//! A simulated polling client.
//!
//! [`PanelHarness`] plays the browser: it keeps the last revision it was
//! sent as its baseline, drives polls and updates through a
//! [`MemoryTransport`] and decodes every payload. Each payload is also
//! checked to be valid JSON.

use ajane_core::{MemoryTransport, Panel, Revision, SyncOutcome};
use ajane_protocol::names::REVISION_FIELD;
use ajane_protocol::DiffPayload;

/// Drives one panel like a single polling client.
pub struct PanelHarness {
    /// The panel under test.
    pub panel: Panel,
    baseline: Option<Revision>,
    last_raw: String,
}

impl PanelHarness {
    /// Creates a harness for a client that loaded the page at the panel's
    /// current revision.
    pub fn new(panel: Panel) -> Self {
        let baseline = Some(panel.revision());
        Self {
            panel,
            baseline,
            last_raw: String::new(),
        }
    }

    /// Creates a harness for a client with no baseline.
    pub fn fresh(panel: Panel) -> Self {
        Self {
            panel,
            baseline: None,
            last_raw: String::new(),
        }
    }

    /// The client's current baseline.
    pub fn baseline(&self) -> Option<Revision> {
        self.baseline
    }

    /// Overrides the client's baseline.
    pub fn set_baseline(&mut self, baseline: Option<Revision>) {
        self.baseline = baseline;
    }

    /// Raw text of the last payload received.
    pub fn last_raw(&self) -> &str {
        &self.last_raw
    }

    /// Polls with the current baseline and advances it.
    pub fn poll(&mut self) -> DiffPayload {
        self.request(&[], |_| {}).1
    }

    /// Polls against `since` without touching the baseline.
    pub fn poll_since(&mut self, since: Option<Revision>) -> DiffPayload {
        let raw = self.panel.render_payload(since);
        decode(&raw)
    }

    /// Submits `fields` with the current baseline and advances it.
    pub fn update(&mut self, fields: &[(&str, &str)]) -> DiffPayload {
        self.request(fields, |_| {}).1
    }

    /// Submits `fields` with a reaction hook and advances the baseline.
    pub fn update_with<H>(&mut self, fields: &[(&str, &str)], hook: H) -> DiffPayload
    where
        H: FnOnce(&mut Panel),
    {
        self.request(fields, hook).1
    }

    /// Runs one request through [`Panel::handle_request`].
    pub fn request<H>(&mut self, fields: &[(&str, &str)], hook: H) -> (SyncOutcome, DiffPayload)
    where
        H: FnOnce(&mut Panel),
    {
        let mut transport = MemoryTransport::new();
        if let Some(baseline) = self.baseline {
            transport.set_field(REVISION_FIELD, &baseline.to_string());
        }
        for (name, value) in fields {
            transport.set_field(name, value);
        }

        let outcome = self
            .panel
            .handle_request(&mut transport, hook)
            .expect("Request failed");
        assert_eq!(transport.is_markup(), Some(false), "Payload must be JSON");

        self.last_raw = transport.take_body();
        let payload = decode(&self.last_raw);
        assert_eq!(payload.revision, outcome.revision());
        self.baseline = Some(payload.revision);
        (outcome, payload)
    }
}

/// Decodes a payload, asserting that it is valid JSON with the revision
/// member first.
pub fn decode(raw: &str) -> DiffPayload {
    let value: serde_json::Value = serde_json::from_str(raw).expect("Payload is not valid JSON");
    assert!(value.is_object(), "Payload must be an object: {raw}");
    assert!(
        raw.starts_with("{\"ArduJAXrevision\":"),
        "Revision must come first: {raw}"
    );
    DiffPayload::decode(raw).expect("Failed to decode payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario_panel;

    #[test]
    fn baseline_follows_payloads() {
        let mut harness = PanelHarness::new(scenario_panel().panel);
        assert_eq!(harness.baseline(), Some(Revision::INITIAL));

        let diff = harness.update(&[("name", "Bob")]);
        assert_eq!(diff.revision, Revision::new(2));
        assert_eq!(harness.baseline(), Some(Revision::new(2)));
        assert_eq!(
            harness.last_raw(),
            r#"{"ArduJAXrevision":2,"name":{"value":"Bob"}}"#
        );

        assert!(harness.poll().is_empty());
    }

    #[test]
    fn fresh_client_gets_everything() {
        let mut harness = PanelHarness::fresh(scenario_panel().panel);
        let diff = harness.poll();
        assert!(diff.record("name").is_some());
        assert!(diff.record("ok").is_some());
    }
}
