//! Tree nodes: static content, widgets and composites.

use crate::id::{NodeId, WidgetId};
use crate::widget::Element;
use std::borrow::Cow;

/// Default markup of a [`ConnectionIndicator`] while the server answers.
pub const INDICATOR_OK: &str = "<span style=\"color:green\">&#10004;</span>";

/// Default markup of a [`ConnectionIndicator`] after the connection broke.
pub const INDICATOR_FAIL: &str = "<span style=\"color:red\">&#10008; connection lost</span>";

/// A node of the panel tree.
///
/// The set of node kinds is closed; nodes are addressed by [`NodeId`] into
/// the panel's arena.
#[derive(Debug)]
pub enum Node {
    /// A fixed chunk of markup.
    Static(StaticContent),
    /// A client-side connection status display.
    Indicator(ConnectionIndicator),
    /// A stateful widget.
    Element(Element),
    /// An ordered list of children, optionally hideable as a whole.
    Container(Container),
    /// An exclusive-selection group of check buttons.
    RadioGroup(RadioGroup),
}

impl Node {
    /// Child handles in display order. Empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Container(container) => &container.children,
            Node::RadioGroup(group) => &group.members,
            _ => &[],
        }
    }

    /// The widget carried by this node, if any. For a hideable container
    /// this is its own division element.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Container(container) => container.division.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Container(container) => container.division.as_mut(),
            _ => None,
        }
    }

    /// Short description of the node kind, used in errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Static(_) => "static content",
            Node::Indicator(_) => "connection indicator",
            Node::Element(element) => element.kind().name(),
            Node::Container(_) => "container",
            Node::RadioGroup(_) => "radio group",
        }
    }
}

/// A chunk of markup that never changes.
///
/// It does not have to be a complete HTML element.
#[derive(Debug, Clone)]
pub struct StaticContent {
    pub(crate) html: Cow<'static, str>,
}

impl StaticContent {
    /// The markup.
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Shows whether the client still reaches the server.
///
/// The logic runs entirely in the client; for the server this is static
/// markup.
#[derive(Debug, Clone)]
pub struct ConnectionIndicator {
    pub(crate) ok: Option<Cow<'static, str>>,
    pub(crate) fail: Option<Cow<'static, str>>,
}

impl ConnectionIndicator {
    /// Markup shown while requests are answered.
    pub fn ok_html(&self) -> &str {
        self.ok.as_deref().unwrap_or(INDICATOR_OK)
    }

    /// Markup shown once the connection is considered broken.
    pub fn fail_html(&self) -> &str {
        self.fail.as_deref().unwrap_or(INDICATOR_FAIL)
    }
}

/// An ordered aggregation of child nodes.
///
/// A hideable container carries its own division element; hiding it hides
/// the whole sub-tree, static content included.
#[derive(Debug)]
pub struct Container {
    pub(crate) division: Option<Element>,
    pub(crate) children: Vec<NodeId>,
}

impl Container {
    /// Child handles in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The division element of a hideable container.
    pub fn division(&self) -> Option<&Element> {
        self.division.as_ref()
    }

    /// Returns true if this container has its own id.
    pub fn is_hideable(&self) -> bool {
        self.division.is_some()
    }
}

/// Radio-button semantics over a set of check buttons: at most one member
/// is checked.
#[derive(Debug, Clone)]
pub struct RadioGroup {
    pub(crate) name: WidgetId,
    pub(crate) members: Vec<NodeId>,
    pub(crate) selected: i16,
}

impl RadioGroup {
    /// The id base shared by all members; also the client-side group name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Member handles in option order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Index of the selected member, if any.
    pub fn selected_option(&self) -> Option<usize> {
        usize::try_from(self.selected)
            .ok()
            .filter(|index| *index < self.members.len())
    }
}
