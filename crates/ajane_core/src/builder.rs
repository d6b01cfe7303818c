//! Panel construction.
//!
//! Nodes are created bottom-up: leaves first, then the composites that own
//! them. Every node must end up with exactly one parent (or be a root), so
//! the topology is always a strict tree.

use crate::clock::ChangeClock;
use crate::config::PanelConfig;
use crate::error::{CoreError, CoreResult};
use crate::id::{NodeId, WidgetId};
use crate::node::{ConnectionIndicator, Container, Node, RadioGroup, StaticContent};
use crate::panel::Panel;
use crate::property::PropertyFlags;
use crate::widget::{Element, ElementKind, GroupLink};
use ajane_protocol::names::{REVISION_FIELD, REVISION_KEY};
use ajane_protocol::Rgb;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::debug;

/// Builder for a [`Panel`].
///
/// # Example
///
/// ```
/// use ajane_core::{Panel, PanelConfig};
///
/// let mut builder = Panel::builder(PanelConfig::default());
/// let title = builder.static_html("<h1>Pump</h1>")?;
/// let speed = builder.slider("speed", 0, 100, 20)?;
/// let panel = builder.build(&[title, speed])?;
/// assert_eq!(panel.slider_value(speed)?, 20);
/// # Ok::<(), ajane_core::CoreError>(())
/// ```
pub struct PanelBuilder {
    config: PanelConfig,
    nodes: Vec<Node>,
    attached: Vec<bool>,
}

impl PanelBuilder {
    /// Creates a builder. The node arena is allocated up front.
    pub fn new(config: PanelConfig) -> Self {
        let capacity = config.max_nodes.min(usize::from(u16::MAX));
        Self {
            config,
            nodes: Vec::with_capacity(capacity),
            attached: Vec::with_capacity(capacity),
        }
    }

    /// Fails unless `count` more nodes fit.
    fn reserve(&self, count: usize) -> CoreResult<()> {
        let capacity = self.config.max_nodes.min(usize::from(u16::MAX));
        if self.nodes.len().saturating_add(count) > capacity {
            return Err(CoreError::CapacityExceeded {
                capacity: self.config.max_nodes,
            });
        }
        Ok(())
    }

    fn push(&mut self, node: Node) -> CoreResult<NodeId> {
        self.reserve(1)?;
        let id = NodeId::new(self.nodes.len() as u16);
        self.nodes.push(node);
        self.attached.push(false);
        Ok(id)
    }

    fn new_element(&self, id: &str, kind: ElementKind, flags: PropertyFlags) -> CoreResult<Element> {
        let id = WidgetId::new(id)?;
        if id == *REVISION_KEY || id == *REVISION_FIELD {
            return Err(CoreError::ReservedId(id.to_string()));
        }
        Ok(Element::new(id, kind, flags, self.config.initial_revision))
    }

    fn element(&mut self, id: &str, kind: ElementKind, flags: PropertyFlags) -> CoreResult<NodeId> {
        let element = self.new_element(id, kind, flags)?;
        self.push(Node::Element(element))
    }

    /// Marks `children` as owned by a new parent.
    fn attach(&mut self, children: &[NodeId]) -> CoreResult<()> {
        for &child in children {
            match self.attached.get(child.index()) {
                None => return Err(CoreError::UnknownNode(child)),
                Some(true) => return Err(CoreError::NodeAlreadyAttached(child)),
                Some(false) => {}
            }
        }
        let mut seen = HashSet::with_capacity(children.len());
        for &child in children {
            if !seen.insert(child) {
                return Err(CoreError::NodeAlreadyAttached(child));
            }
            self.attached[child.index()] = true;
        }
        Ok(())
    }

    /// Adds a chunk of static markup.
    pub fn static_html(&mut self, html: impl Into<Cow<'static, str>>) -> CoreResult<NodeId> {
        self.push(Node::Static(StaticContent { html: html.into() }))
    }

    /// Adds a connection indicator with the default markup.
    pub fn connection_indicator(&mut self) -> CoreResult<NodeId> {
        self.push(Node::Indicator(ConnectionIndicator {
            ok: None,
            fail: None,
        }))
    }

    /// Adds a connection indicator with custom markup for both states.
    pub fn connection_indicator_with(
        &mut self,
        ok: impl Into<Cow<'static, str>>,
        fail: impl Into<Cow<'static, str>>,
    ) -> CoreResult<NodeId> {
        self.push(Node::Indicator(ConnectionIndicator {
            ok: Some(ok.into()),
            fail: Some(fail.into()),
        }))
    }

    /// Adds a span showing plain text.
    pub fn span(&mut self, id: &str, text: &str) -> CoreResult<NodeId> {
        self.element(id, ElementKind::span(text), PropertyFlags::default())
    }

    /// Adds a span whose content is trusted markup.
    pub fn html_span(&mut self, id: &str, html: &str) -> CoreResult<NodeId> {
        self.element(
            id,
            ElementKind::span(html),
            PropertyFlags::default() | PropertyFlags::HTML_ALLOWED,
        )
    }

    /// Adds a text field holding at most `capacity` bytes.
    pub fn text_input(&mut self, id: &str, capacity: usize) -> CoreResult<NodeId> {
        self.element(id, ElementKind::text_input(capacity), PropertyFlags::default())
    }

    /// Adds a slider. The initial value is clamped to the range.
    pub fn slider(&mut self, id: &str, min: i16, max: i16, initial: i16) -> CoreResult<NodeId> {
        if min > max {
            return Err(CoreError::InvalidRange { min, max });
        }
        self.element(
            id,
            ElementKind::slider(min, max, initial),
            PropertyFlags::default(),
        )
    }

    /// Adds a colour picker.
    pub fn color_picker(&mut self, id: &str, color: Rgb) -> CoreResult<NodeId> {
        self.element(id, ElementKind::color_picker(color), PropertyFlags::default())
    }

    /// Adds a push button. The label may contain markup.
    pub fn push_button<F>(&mut self, id: &str, label: &str, callback: F) -> CoreResult<NodeId>
    where
        F: FnMut(&mut Panel, NodeId) + Send + 'static,
    {
        self.element(
            id,
            ElementKind::push_button(label, Some(Box::new(callback))),
            PropertyFlags::default() | PropertyFlags::HTML_ALLOWED,
        )
    }

    /// Adds a free-standing check box.
    pub fn check_button(&mut self, id: &str, label: &str, checked: bool) -> CoreResult<NodeId> {
        self.element(
            id,
            ElementKind::check_button(label, checked, None),
            PropertyFlags::default(),
        )
    }

    /// Adds a drop-down list.
    pub fn option_select(
        &mut self,
        id: &str,
        labels: &[&str],
        selected: Option<usize>,
    ) -> CoreResult<NodeId> {
        let selected = option_index(labels.len(), selected)?;
        self.element(
            id,
            ElementKind::option_select(labels, selected),
            PropertyFlags::default(),
        )
    }

    /// Adds a plain container owning `children`.
    pub fn container(&mut self, children: &[NodeId]) -> CoreResult<NodeId> {
        self.attach(children)?;
        self.push(Node::Container(Container {
            division: None,
            children: children.to_vec(),
        }))
    }

    /// Adds a container with its own id, which can be hidden as a whole.
    pub fn hideable_container(&mut self, id: &str, children: &[NodeId]) -> CoreResult<NodeId> {
        let division = self.new_element(id, ElementKind::Division, PropertyFlags::default())?;
        self.attach(children)?;
        self.push(Node::Container(Container {
            division: Some(division),
            children: children.to_vec(),
        }))
    }

    /// Adds a radio group with one check button per option. Member ids are
    /// `<id_base>0`, `<id_base>1`, and so on.
    pub fn radio_group(
        &mut self,
        id_base: &str,
        options: &[&str],
        selected: Option<usize>,
    ) -> CoreResult<NodeId> {
        let name = WidgetId::new(id_base)?;
        let selected = option_index(options.len(), selected)?;
        // Nothing is pushed until every member id and slot is known to fit.
        let ids = (0..options.len())
            .map(|index| WidgetId::indexed(id_base, index))
            .collect::<CoreResult<Vec<_>>>()?;
        self.reserve(options.len() + 1)?;
        let group = self.push(Node::RadioGroup(RadioGroup {
            name,
            members: Vec::with_capacity(options.len()),
            selected,
        }))?;

        let mut members = Vec::with_capacity(options.len());
        for (index, (label, id)) in options.iter().zip(&ids).enumerate() {
            let link = GroupLink {
                group,
                index: index as u16,
            };
            let checked = usize::try_from(selected).ok() == Some(index);
            let element = self.new_element(
                id.as_str(),
                ElementKind::check_button(label, checked, Some(link)),
                PropertyFlags::default(),
            )?;
            members.push(self.push(Node::Element(element))?);
        }
        self.attach(&members)?;
        if let Some(Node::RadioGroup(radio)) = self.nodes.get_mut(group.index()) {
            radio.members = members;
        }
        Ok(group)
    }

    /// Finishes the panel with `roots` as its top-level nodes.
    ///
    /// Fails if a node was never attached or if two widgets share an id.
    pub fn build(mut self, roots: &[NodeId]) -> CoreResult<Panel> {
        self.attach(roots)?;
        if let Some(index) = self.attached.iter().position(|attached| !attached) {
            return Err(CoreError::DetachedNode(NodeId::new(index as u16)));
        }

        let mut ids = HashSet::with_capacity(self.nodes.len());
        for element in self.nodes.iter().filter_map(Node::element) {
            if !ids.insert(element.widget_id()) {
                return Err(CoreError::DuplicateId(element.id().to_string()));
            }
        }

        debug!(nodes = self.nodes.len(), widgets = ids.len(), "panel built");
        Ok(Panel {
            clock: ChangeClock::new(self.config.initial_revision),
            config: self.config,
            nodes: self.nodes,
            roots: roots.to_vec(),
        })
    }
}

/// Converts an optional option index to the stored form, where `-1` means
/// nothing is selected.
fn option_index(count: usize, selected: Option<usize>) -> CoreResult<i16> {
    if count > i16::MAX as usize {
        return Err(CoreError::TooManyOptions { count });
    }
    Ok(selected
        .filter(|index| *index < count)
        .map_or(-1, |index| index as i16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree() {
        let mut builder = Panel::builder(PanelConfig::default());
        let title = builder.static_html("<h1>x</h1>").unwrap();
        let name = builder.text_input("name", 8).unwrap();
        let ok = builder.check_button("ok", "OK", false).unwrap();
        let group = builder.container(&[name, ok]).unwrap();
        let panel = builder.build(&[title, group]).unwrap();

        assert_eq!(panel.len(), 4);
        assert_eq!(panel.roots(), &[title, group]);
        assert_eq!(panel.revision(), crate::Revision::INITIAL);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut builder = Panel::builder(PanelConfig::default());
        let a = builder.span("x", "").unwrap();
        let b = builder.slider("x", 0, 1, 0).unwrap();
        assert!(matches!(
            builder.build(&[a, b]),
            Err(CoreError::DuplicateId(id)) if id == "x"
        ));
    }

    #[test]
    fn rejects_reserved_ids() {
        let mut builder = Panel::builder(PanelConfig::default());
        assert!(matches!(
            builder.span("revision", ""),
            Err(CoreError::ReservedId(_))
        ));
        assert!(matches!(
            builder.span("ArduJAXrevision", ""),
            Err(CoreError::ReservedId(_))
        ));
    }

    #[test]
    fn rejects_detached_and_reattached_nodes() {
        let mut builder = Panel::builder(PanelConfig::default());
        let a = builder.span("a", "").unwrap();
        let b = builder.span("b", "").unwrap();
        let container = builder.container(&[a]).unwrap();
        assert!(matches!(
            builder.container(&[a]),
            Err(CoreError::NodeAlreadyAttached(node)) if node == a
        ));
        assert!(matches!(
            builder.container(&[b, b]),
            Err(CoreError::NodeAlreadyAttached(_))
        ));
        assert!(matches!(
            builder.build(&[container]),
            Err(CoreError::DetachedNode(node)) if node == b
        ));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut builder = Panel::builder(PanelConfig::default().max_nodes(2));
        builder.static_html("a").unwrap();
        builder.static_html("b").unwrap();
        assert!(matches!(
            builder.static_html("c"),
            Err(CoreError::CapacityExceeded { capacity: 2 })
        ));
    }

    #[test]
    fn radio_group_members() {
        let mut builder = Panel::builder(PanelConfig::default());
        let group = builder.radio_group("mode", &["off", "on"], Some(1)).unwrap();
        let panel = builder.build(&[group]).unwrap();

        let members = panel.node(group).unwrap().children().to_vec();
        assert_eq!(members.len(), 2);
        assert_eq!(panel.element(members[0]).unwrap().id(), "mode0");
        assert!(!panel.is_checked(members[0]).unwrap());
        assert!(panel.is_checked(members[1]).unwrap());
        assert_eq!(panel.selected_option(group).unwrap(), Some(1));
    }

    #[test]
    fn failed_radio_group_leaves_no_nodes() {
        let mut builder = Panel::builder(PanelConfig::default());
        let span = builder.span("status", "").unwrap();
        let options = ["o"; 11];
        assert!(matches!(
            builder.radio_group("fifteen-bytes!!", &options, None),
            Err(CoreError::IdTooLong { .. })
        ));
        builder.build(&[span]).unwrap();

        let mut builder = Panel::builder(PanelConfig::default().max_nodes(3));
        let span = builder.span("status", "").unwrap();
        assert!(matches!(
            builder.radio_group("mode", &["a", "b"], None),
            Err(CoreError::CapacityExceeded { capacity: 3 })
        ));
        builder.build(&[span]).unwrap();
    }

    #[test]
    fn invalid_slider_range() {
        let mut builder = Panel::builder(PanelConfig::default());
        assert!(matches!(
            builder.slider("s", 5, 1, 3),
            Err(CoreError::InvalidRange { min: 5, max: 1 })
        ));
    }

    #[test]
    fn option_index_normalization() {
        assert_eq!(option_index(3, Some(2)).unwrap(), 2);
        assert_eq!(option_index(3, Some(3)).unwrap(), -1);
        assert_eq!(option_index(3, None).unwrap(), -1);
        assert!(option_index(40_000, None).is_err());
    }
}
