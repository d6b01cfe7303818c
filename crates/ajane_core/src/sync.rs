//! The synchronization walk.
//!
//! Two entry points per request:
//!
//! - **Poll**: diff the tree against the client's baseline and write the
//!   payload. Nothing is mutated.
//! - **Update**: apply the client's fields in tree order, run button
//!   callbacks, run the reaction hook, commit, then answer like a poll
//!   against the client's baseline, so the client also receives the
//!   changes its own submission triggered.
//!
//! [`Panel::handle_request`] decides between the two from the request
//! fields.

use crate::error::{CoreError, CoreResult};
use crate::id::NodeId;
use crate::node::Node;
use crate::panel::Panel;
use crate::transport::{Transport, TransportError, TransportWriter};
use crate::widget::{Element, ElementKind, Inbound};
use ajane_protocol::names::REVISION_FIELD;
use ajane_protocol::{Baseline, PayloadEncoder, Revision};
use std::fmt::{self, Write};
use tracing::{debug, trace, warn};

/// What a request turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No widget field was present; the panel was only diffed.
    Polled {
        /// Revision sent as the client's next baseline.
        revision: Revision,
    },
    /// At least one widget field was present and applied.
    Updated {
        /// Revision sent as the client's next baseline.
        revision: Revision,
        /// Number of request fields that matched a widget.
        fields: usize,
    },
}

impl SyncOutcome {
    /// Revision sent as the client's next baseline.
    pub fn revision(&self) -> Revision {
        match self {
            SyncOutcome::Polled { revision } | SyncOutcome::Updated { revision, .. } => *revision,
        }
    }

    /// Returns true if the request carried widget fields.
    pub fn is_update(&self) -> bool {
        matches!(self, SyncOutcome::Updated { .. })
    }
}

impl Panel {
    /// Writes one record per widget that changed after `since`, in tree
    /// order.
    ///
    /// `first` states whether the next record is the first member of the
    /// whole output; it threads through nested composites so records from
    /// any depth join into one flat, comma-separated list. Returns true if
    /// anything was written.
    pub fn diff_since<W: Write + ?Sized>(
        &self,
        since: Option<Revision>,
        first: bool,
        encoder: &mut PayloadEncoder<'_, W>,
    ) -> Result<bool, fmt::Error> {
        let baseline = self.clock.baseline(since);
        if baseline == Baseline::Current {
            return Ok(false);
        }
        self.diff_nodes(&self.roots, baseline, first, encoder)
    }

    fn diff_nodes<W: Write + ?Sized>(
        &self,
        nodes: &[NodeId],
        baseline: Baseline,
        mut first: bool,
        encoder: &mut PayloadEncoder<'_, W>,
    ) -> Result<bool, fmt::Error> {
        let mut emitted = false;
        for &node in nodes {
            let Some(entry) = self.nodes.get(node.index()) else {
                continue;
            };
            if let Some(element) = entry.element() {
                if self.write_record(element, baseline, first, encoder)? {
                    emitted = true;
                    first = false;
                }
            }
            if self.diff_nodes(entry.children(), baseline, first, encoder)? {
                emitted = true;
                first = false;
            }
        }
        Ok(emitted)
    }

    fn write_record<W: Write + ?Sized>(
        &self,
        element: &Element,
        baseline: Baseline,
        first: bool,
        encoder: &mut PayloadEncoder<'_, W>,
    ) -> Result<bool, fmt::Error> {
        let mut changed = element.changed_properties(baseline, &self.clock).peekable();
        if changed.peek().is_none() {
            return Ok(false);
        }
        encoder.begin_record(element.id(), first)?;
        for property in changed {
            if let (Some(name), Some(value)) =
                (element.property_name(property), element.render_value(property))
            {
                encoder.property(name, value, element.needs_escaping(property))?;
            }
        }
        encoder.end_record()?;
        Ok(true)
    }

    /// Writes a complete payload for `since` into `out`. Returns the number
    /// of records.
    fn write_payload<W: Write + ?Sized>(
        &self,
        since: Option<Revision>,
        out: &mut W,
    ) -> Result<usize, fmt::Error> {
        let mut encoder = PayloadEncoder::begin(out, self.revision())?;
        self.diff_since(since, false, &mut encoder)?;
        let records = encoder.record_count();
        encoder.finish()?;
        Ok(records)
    }

    /// Renders the payload for `since` as a string.
    pub fn render_payload(&self, since: Option<Revision>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_payload(since, &mut out);
        out
    }

    /// Answers a poll: writes the diff against `since` and returns the
    /// revision the client should present next time.
    pub fn poll<T: Transport + ?Sized>(
        &self,
        since: Option<Revision>,
        transport: &mut T,
    ) -> CoreResult<Revision> {
        let revision = self.revision();
        transport.begin_response(false)?;

        let mut writer = TransportWriter::new(transport);
        let written = self.write_payload(since, &mut writer);
        match (written, writer.into_error()) {
            (Ok(records), _) => {
                debug!(?since, %revision, records, "diff sent");
                Ok(revision)
            }
            (Err(_), Some(error)) => {
                warn!(%error, "failed to write diff");
                Err(error.into())
            }
            (Err(_), None) => Err(CoreError::Transport(TransportError::Write(
                "payload formatting failed".into(),
            ))),
        }
    }

    /// Answers an update: applies every field the transport carries for a
    /// widget, runs click callbacks and `hook`, commits, then writes the
    /// diff against `since`.
    ///
    /// On a transport failure the request fails; changes applied so far
    /// stay pending and become visible with the next commit.
    pub fn update<T, H>(
        &mut self,
        since: Option<Revision>,
        transport: &mut T,
        hook: H,
    ) -> CoreResult<Revision>
    where
        T: Transport + ?Sized,
        H: FnOnce(&mut Panel),
    {
        let mut clicked = Vec::new();
        let fields = self.apply_fields(&*transport, &mut clicked)?;
        self.finish_update(&clicked, hook);
        trace!(fields, "update applied");
        self.poll(since, transport)
    }

    /// Handles one sync request.
    ///
    /// The `revision` field is the client's baseline; a missing or
    /// malformed value means "send everything". If any widget field is
    /// present, the request is an update, otherwise a poll.
    pub fn handle_request<T, H>(&mut self, transport: &mut T, hook: H) -> CoreResult<SyncOutcome>
    where
        T: Transport + ?Sized,
        H: FnOnce(&mut Panel),
    {
        let since = read_since(&*transport)?;
        let mut clicked = Vec::new();
        let fields = self.apply_fields(&*transport, &mut clicked)?;

        if fields == 0 {
            if self.config.commit_on_poll {
                self.commit();
            }
            let revision = self.poll(since, transport)?;
            return Ok(SyncOutcome::Polled { revision });
        }

        self.finish_update(&clicked, hook);
        let revision = self.poll(since, transport)?;
        Ok(SyncOutcome::Updated { revision, fields })
    }

    fn finish_update<H: FnOnce(&mut Panel)>(&mut self, clicked: &[NodeId], hook: H) {
        self.run_callbacks(clicked);
        hook(self);
        self.commit();
    }

    /// Applies inbound fields to every widget in tree order. Returns the
    /// number of fields that matched a widget; clicked buttons are appended
    /// to `clicked` in the same order.
    fn apply_fields<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        clicked: &mut Vec<NodeId>,
    ) -> CoreResult<usize> {
        let mut fields = 0;
        let mut position = 0;
        while let Some(&root) = self.roots.get(position) {
            fields += self.apply_subtree(root, transport, clicked)?;
            position += 1;
        }
        Ok(fields)
    }

    fn apply_subtree<T: Transport + ?Sized>(
        &mut self,
        node: NodeId,
        transport: &T,
        clicked: &mut Vec<NodeId>,
    ) -> CoreResult<usize> {
        let mut fields = 0;
        let toggled = {
            let Panel { nodes, clock, .. } = &mut *self;
            match nodes.get_mut(node.index()).and_then(Node::element_mut) {
                Some(element) => match transport.read_field(element.id())? {
                    Some(raw) => {
                        fields += 1;
                        let outcome = element.apply_inbound(raw, clock);
                        trace!(id = element.id(), ?outcome, "inbound field");
                        match (outcome, element.kind()) {
                            (Inbound::Toggled(checked), ElementKind::CheckButton(button)) => {
                                button.group().map(|link| (link, checked))
                            }
                            (Inbound::Clicked, _) => {
                                clicked.push(node);
                                None
                            }
                            _ => None,
                        }
                    }
                    None => None,
                },
                None => None,
            }
        };
        if let Some((link, checked)) = toggled {
            self.toggle_member(link, checked)?;
        }

        let mut position = 0;
        while let Some(child) = self.child_at(node, position) {
            fields += self.apply_subtree(child, transport, clicked)?;
            position += 1;
        }
        Ok(fields)
    }

    /// Runs the callback of every button in `clicked`, in that order and at
    /// most once each.
    fn run_callbacks(&mut self, clicked: &[NodeId]) {
        for &node in clicked {
            let Some(pending) = self
                .nodes
                .get_mut(node.index())
                .and_then(Node::element_mut)
                .and_then(Element::take_click)
            else {
                continue;
            };
            debug!(%node, "button clicked");
            if let Some(mut callback) = pending {
                callback(self, node);
                if let Some(element) = self
                    .nodes
                    .get_mut(node.index())
                    .and_then(Node::element_mut)
                {
                    element.restore_callback(callback);
                }
            }
        }
    }
}

fn read_since<T: Transport + ?Sized>(transport: &T) -> CoreResult<Option<Revision>> {
    let Some(raw) = transport.read_field(REVISION_FIELD)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(revision) => Ok(Some(revision)),
        Err(error) => {
            debug!(%error, "unusable baseline, sending everything");
            Ok(None)
        }
    }
}
