//! Panel fixtures.
//!
//! Each fixture builds a fresh panel with the default configuration and
//! returns the handles tests need alongside it.

use ajane_core::{Node, NodeId, Panel, PanelConfig};

/// A text input and a check button.
pub struct ScenarioPanel {
    /// The panel.
    pub panel: Panel,
    /// `TextInput("name", 8)`.
    pub name: NodeId,
    /// `CheckButton("ok")`.
    pub ok: NodeId,
}

/// Builds `[TextInput("name", 8), CheckButton("ok")]` at revision 1.
pub fn scenario_panel() -> ScenarioPanel {
    let mut builder = Panel::builder(PanelConfig::default());
    let name = builder.text_input("name", 8).expect("Failed to add text input");
    let ok = builder
        .check_button("ok", "OK", false)
        .expect("Failed to add check button");
    let panel = builder.build(&[name, ok]).expect("Failed to build panel");
    ScenarioPanel { panel, name, ok }
}

/// A single radio group.
pub struct RadioPanel {
    /// The panel.
    pub panel: Panel,
    /// The group node.
    pub group: NodeId,
    /// Member check buttons, in option order.
    pub members: Vec<NodeId>,
}

impl RadioPanel {
    /// Checked state of every member, in option order.
    pub fn checked(&self) -> Vec<bool> {
        self.members
            .iter()
            .map(|member| self.panel.is_checked(*member).expect("Member is not a check button"))
            .collect()
    }
}

/// Builds a radio group `mode` with `options` members and nothing selected.
pub fn radio_panel(options: usize) -> RadioPanel {
    let labels: Vec<String> = (0..options).map(|index| format!("Option {index}")).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();

    let mut builder = Panel::builder(PanelConfig::default());
    let group = builder
        .radio_group("mode", &labels, None)
        .expect("Failed to add radio group");
    let panel = builder.build(&[group]).expect("Failed to build panel");

    let members = match panel.node(group) {
        Ok(Node::RadioGroup(radio)) => radio.members().to_vec(),
        _ => Vec::new(),
    };
    RadioPanel {
        panel,
        group,
        members,
    }
}

/// A flat panel of spans.
pub struct SpanPanel {
    /// The panel.
    pub panel: Panel,
    /// Spans `s0`, `s1`, ... in tree order.
    pub spans: Vec<NodeId>,
}

impl SpanPanel {
    /// Widget id of span `index`.
    pub fn id(index: usize) -> String {
        format!("s{index}")
    }
}

/// Builds `count` empty spans `s0..s<count>` as roots.
pub fn span_panel(count: usize) -> SpanPanel {
    let mut builder = Panel::builder(PanelConfig::default());
    let spans: Vec<NodeId> = (0..count)
        .map(|index| {
            builder
                .span(&SpanPanel::id(index), "")
                .expect("Failed to add span")
        })
        .collect();
    let panel = builder.build(&spans).expect("Failed to build panel");
    SpanPanel { panel, spans }
}

/// Nested composites: a hideable section holding a plain container, a
/// radio group and a slider, between static chunks.
pub struct NestedPanel {
    /// The panel.
    pub panel: Panel,
    /// Hideable container `section`.
    pub section: NodeId,
    /// Span `inner` inside the plain container.
    pub inner: NodeId,
    /// Radio group `pick` with three members.
    pub pick: NodeId,
    /// Slider `level`, range 0..=100.
    pub level: NodeId,
    /// Span `outer` after the section.
    pub outer: NodeId,
}

/// Builds the nested fixture.
pub fn nested_panel() -> NestedPanel {
    let mut builder = Panel::builder(PanelConfig::default());
    let header = builder.static_html("<h1>Nested</h1>").expect("Failed to add markup");
    let inner = builder.span("inner", "a").expect("Failed to add span");
    let note = builder.static_html("<hr>").expect("Failed to add markup");
    let group = builder.container(&[inner, note]).expect("Failed to add container");
    let pick = builder
        .radio_group("pick", &["x", "y", "z"], Some(0))
        .expect("Failed to add radio group");
    let level = builder.slider("level", 0, 100, 10).expect("Failed to add slider");
    let section = builder
        .hideable_container("section", &[group, pick, level])
        .expect("Failed to add section");
    let outer = builder.span("outer", "b").expect("Failed to add span");
    let panel = builder
        .build(&[header, section, outer])
        .expect("Failed to build panel");

    NestedPanel {
        panel,
        section,
        inner,
        pick,
        level,
        outer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_build() {
        let scenario = scenario_panel();
        assert_eq!(scenario.panel.text(scenario.name).unwrap(), "");
        assert!(!scenario.panel.is_checked(scenario.ok).unwrap());

        let radio = radio_panel(3);
        assert_eq!(radio.checked(), vec![false, false, false]);

        let spans = span_panel(4);
        assert_eq!(spans.panel.find("s3"), Some(spans.spans[3]));

        let nested = nested_panel();
        assert_eq!(nested.panel.selected_option(nested.pick).unwrap(), Some(0));
        assert!(nested.panel.find("pick2").is_some());
    }
}
