//! The panel: a fixed widget tree plus its change clock.

use crate::builder::PanelBuilder;
use crate::clock::ChangeClock;
use crate::config::PanelConfig;
use crate::error::{CoreError, CoreResult};
use crate::id::NodeId;
use crate::node::Node;
use crate::property::Property;
use crate::widget::{Element, ElementKind, GroupLink};
use ajane_protocol::{Revision, Rgb};
use tracing::trace;

/// A control panel.
///
/// The tree topology is fixed when the panel is built; afterwards only
/// property values and the change clock mutate. Every setter stamps the
/// properties it actually changes with the clock's pending revision. Call
/// [`Panel::commit`] to make a batch of changes visible to clients.
#[derive(Debug)]
pub struct Panel {
    pub(crate) config: PanelConfig,
    pub(crate) clock: ChangeClock,
    pub(crate) nodes: Vec<Node>,
    pub(crate) roots: Vec<NodeId>,
}

impl Panel {
    /// Starts building a panel.
    pub fn builder(config: PanelConfig) -> PanelBuilder {
        PanelBuilder::new(config)
    }

    /// The configuration the panel was built with.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// The revision clients currently see.
    pub fn revision(&self) -> Revision {
        self.clock.visible_revision()
    }

    /// The change clock.
    pub fn clock(&self) -> &ChangeClock {
        &self.clock
    }

    /// Returns true if changes are waiting for a commit.
    pub fn has_pending(&self) -> bool {
        self.clock.has_pending()
    }

    /// Makes all pending changes visible as one revision.
    pub fn commit(&mut self) -> Revision {
        self.clock.commit()
    }

    /// Top-level nodes in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the panel has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by handle.
    pub fn node(&self, node: NodeId) -> CoreResult<&Node> {
        self.nodes
            .get(node.index())
            .ok_or(CoreError::UnknownNode(node))
    }

    /// Looks up the widget carried by a node.
    pub fn element(&self, node: NodeId) -> CoreResult<&Element> {
        self.node(node)?
            .element()
            .ok_or_else(|| mismatch(node, "widget"))
    }

    /// Finds the node whose widget has the given id. Depth-first, first
    /// match wins.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.find_in(&self.roots, id)
    }

    fn find_in(&self, nodes: &[NodeId], id: &str) -> Option<NodeId> {
        for &node in nodes {
            let Some(entry) = self.nodes.get(node.index()) else {
                continue;
            };
            if entry.element().is_some_and(|element| element.id() == id) {
                return Some(node);
            }
            if let Some(found) = self.find_in(entry.children(), id) {
                return Some(found);
            }
        }
        None
    }

    pub(crate) fn child_at(&self, node: NodeId, position: usize) -> Option<NodeId> {
        self.nodes
            .get(node.index())?
            .children()
            .get(position)
            .copied()
    }

    // ---- getters ----

    /// Text of a span, text input or push button.
    pub fn text(&self, node: NodeId) -> CoreResult<&str> {
        match self.element(node)?.kind() {
            ElementKind::Span(span) => Ok(span.text()),
            ElementKind::TextInput(input) => Ok(input.text()),
            ElementKind::PushButton(button) => Ok(button.label()),
            _ => Err(mismatch(node, "text widget")),
        }
    }

    /// Value of a slider.
    pub fn slider_value(&self, node: NodeId) -> CoreResult<i16> {
        match self.element(node)?.kind() {
            ElementKind::Slider(slider) => Ok(slider.value()),
            _ => Err(mismatch(node, "slider")),
        }
    }

    /// Colour of a colour picker.
    pub fn color(&self, node: NodeId) -> CoreResult<Rgb> {
        match self.element(node)?.kind() {
            ElementKind::ColorPicker(picker) => Ok(picker.color()),
            _ => Err(mismatch(node, "color picker")),
        }
    }

    /// State of a check button.
    pub fn is_checked(&self, node: NodeId) -> CoreResult<bool> {
        match self.element(node)?.kind() {
            ElementKind::CheckButton(button) => Ok(button.is_checked()),
            _ => Err(mismatch(node, "check button")),
        }
    }

    /// Selected option of a drop-down list or radio group.
    pub fn selected_option(&self, node: NodeId) -> CoreResult<Option<usize>> {
        match self.node(node)? {
            Node::RadioGroup(group) => Ok(group.selected_option()),
            Node::Element(element) => match element.kind() {
                ElementKind::OptionSelect(select) => Ok(select.selected_option()),
                _ => Err(mismatch(node, "selection widget")),
            },
            _ => Err(mismatch(node, "selection widget")),
        }
    }

    // ---- setters ----

    /// Shows or hides a widget. On a plain container or radio group the
    /// change is broadcast to every descendant; a hideable container hides
    /// its whole sub-tree through its own element.
    ///
    /// Hiding a hideable container leaves the visibility flags of its
    /// children alone: they keep their own state and reappear as they were
    /// once the container is shown again.
    pub fn set_visible(&mut self, node: NodeId, visible: bool) -> CoreResult<()> {
        self.set_basic(node, Property::VISIBILITY, visible)
    }

    /// Enables or disables a widget, or every widget below a composite.
    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) -> CoreResult<()> {
        self.set_basic(node, Property::ENABLEDNESS, enabled)
    }

    fn set_basic(&mut self, node: NodeId, property: Property, status: bool) -> CoreResult<()> {
        if matches!(self.node(node)?, Node::Static(_) | Node::Indicator(_)) {
            return Err(mismatch(node, "widget or composite"));
        }
        self.broadcast(node, property, status);
        Ok(())
    }

    fn broadcast(&mut self, node: NodeId, property: Property, status: bool) {
        let Panel { nodes, clock, .. } = self;
        let Some(entry) = nodes.get_mut(node.index()) else {
            return;
        };
        let hides_subtree = matches!(entry, Node::Container(container) if container.is_hideable())
            && property == Property::VISIBILITY;
        if let Some(element) = entry.element_mut() {
            element.set_basic_property(property, status, clock);
        }
        if hides_subtree {
            return;
        }
        let mut position = 0;
        while let Some(child) = self.child_at(node, position) {
            self.broadcast(child, property, status);
            position += 1;
        }
    }

    /// Sets the text of a span, text input or push button. Span and button
    /// text is escaped before the client renders it.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> CoreResult<()> {
        let (element, clock) = self.parts(node)?;
        if element.set_text(text, false, clock) {
            Ok(())
        } else {
            Err(mismatch(node, "text widget"))
        }
    }

    /// Sets trusted markup as the content of a span or push button.
    pub fn set_html(&mut self, node: NodeId, html: &str) -> CoreResult<()> {
        let (element, clock) = self.parts(node)?;
        if element.set_text(html, true, clock) {
            Ok(())
        } else {
            Err(mismatch(node, "text widget"))
        }
    }

    /// Sets a slider value, clamped to the slider's range.
    pub fn set_slider_value(&mut self, node: NodeId, value: i16) -> CoreResult<()> {
        let (element, clock) = self.parts(node)?;
        if !matches!(element.kind(), ElementKind::Slider(_)) {
            return Err(mismatch(node, "slider"));
        }
        element.set_number(value, clock);
        Ok(())
    }

    /// Changes a slider's range. The current value is clamped into it.
    pub fn set_slider_range(&mut self, node: NodeId, min: i16, max: i16) -> CoreResult<()> {
        if min > max {
            return Err(CoreError::InvalidRange { min, max });
        }
        let (element, clock) = self.parts(node)?;
        if element.set_range(min, max, clock) {
            Ok(())
        } else {
            Err(mismatch(node, "slider"))
        }
    }

    /// Sets the colour of a colour picker.
    pub fn set_color(&mut self, node: NodeId, color: Rgb) -> CoreResult<()> {
        let (element, clock) = self.parts(node)?;
        if element.set_color(color, clock) {
            Ok(())
        } else {
            Err(mismatch(node, "color picker"))
        }
    }

    /// Checks or unchecks a check button. For a radio member, checking it
    /// selects it within its group.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) -> CoreResult<()> {
        let link = match self.element(node)?.kind() {
            ElementKind::CheckButton(button) => button.group(),
            _ => return Err(mismatch(node, "check button")),
        };
        match link {
            Some(link) => self.toggle_member(link, checked),
            None => {
                let (element, clock) = self.parts(node)?;
                element.set_checked(checked, clock);
                Ok(())
            }
        }
    }

    /// Selects an option of a drop-down list or radio group. `None` or an
    /// out-of-range index selects nothing.
    pub fn select_option(&mut self, node: NodeId, index: Option<usize>) -> CoreResult<()> {
        let index = index
            .and_then(|index| i16::try_from(index).ok())
            .unwrap_or(-1);
        let is_group = matches!(self.node(node)?, Node::RadioGroup(_));
        if is_group {
            self.select_in_group(node, index);
            return Ok(());
        }
        let (element, clock) = self.parts(node)?;
        if !matches!(element.kind(), ElementKind::OptionSelect(_)) {
            return Err(mismatch(node, "selection widget"));
        }
        element.set_number(index, clock);
        Ok(())
    }

    /// Routes a member's state change through the group's exclusivity
    /// logic.
    pub(crate) fn toggle_member(&mut self, link: GroupLink, checked: bool) -> CoreResult<()> {
        let index = i16::try_from(link.index).unwrap_or(-1);
        if checked {
            self.select_in_group(link.group, index);
        } else if self.selected_option(link.group)? == Some(usize::from(link.index)) {
            self.select_in_group(link.group, -1);
        }
        Ok(())
    }

    /// Checks member `index` and unchecks all others. Only members whose
    /// state changes are stamped.
    fn select_in_group(&mut self, group: NodeId, index: i16) {
        let Panel { nodes, clock, .. } = self;
        let Some(Node::RadioGroup(radio)) = nodes.get_mut(group.index()) else {
            return;
        };
        let selected = match usize::try_from(index) {
            Ok(position) if position < radio.members.len() => index,
            _ => -1,
        };
        radio.selected = selected;
        let members = std::mem::take(&mut radio.members);
        trace!(%group, selected, "radio selection");

        // Clear first so that no two members are ever checked together.
        for (position, member) in members.iter().enumerate() {
            if usize::try_from(selected).ok() != Some(position) {
                if let Some(element) = nodes.get_mut(member.index()).and_then(Node::element_mut) {
                    element.set_checked(false, clock);
                }
            }
        }
        if let Some(member) = usize::try_from(selected).ok().and_then(|i| members.get(i)) {
            if let Some(element) = nodes.get_mut(member.index()).and_then(Node::element_mut) {
                element.set_checked(true, clock);
            }
        }

        if let Some(Node::RadioGroup(radio)) = nodes.get_mut(group.index()) {
            radio.members = members;
        }
    }

    /// Splits the panel into the element of `node` and the clock.
    fn parts(&mut self, node: NodeId) -> CoreResult<(&mut Element, &mut ChangeClock)> {
        let Panel { nodes, clock, .. } = self;
        let element = nodes
            .get_mut(node.index())
            .ok_or(CoreError::UnknownNode(node))?
            .element_mut()
            .ok_or_else(|| mismatch(node, "widget"))?;
        Ok((element, clock))
    }
}

fn mismatch(node: NodeId, expected: &'static str) -> CoreError {
    CoreError::KindMismatch { node, expected }
}
