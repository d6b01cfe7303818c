//! Page rendering.
//!
//! A GET on the panel path returns the whole tree as HTML, each widget in
//! its current state, with the visible revision embedded as the client's
//! first baseline.

use crate::config::ServerConfig;
use crate::script::write_client_script;
use ajane_core::{Element, ElementKind, Node, NodeId, Panel};
use ajane_protocol::{Escape, Escaper};
use std::fmt::{self, Write};

/// Renders the complete page for `panel`.
pub fn render_page(panel: &Panel, config: &ServerConfig) -> String {
    let mut out = String::with_capacity(4096);
    // Writing into a String cannot fail.
    let _ = write_page(&mut out, panel, config);
    out
}

/// Writes the complete page for `panel` into `out`.
pub fn write_page<W: Write + ?Sized>(
    out: &mut W,
    panel: &Panel,
    config: &ServerConfig,
) -> fmt::Result {
    out.write_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>")?;
    text(out, &config.title, false)?;
    out.write_str("</title>\n<script>")?;
    write_client_script(out, panel.revision(), config)?;
    out.write_str("</script>\n")?;
    out.write_str(&config.header_add)?;
    out.write_str("</head>\n<body>\n")?;
    write_nodes(out, panel, panel.roots())?;
    out.write_str("\n</body></html>\n")
}

fn write_nodes<W: Write + ?Sized>(out: &mut W, panel: &Panel, nodes: &[NodeId]) -> fmt::Result {
    for &node in nodes {
        if let Ok(entry) = panel.node(node) {
            write_node(out, panel, entry)?;
        }
    }
    Ok(())
}

fn write_node<W: Write + ?Sized>(out: &mut W, panel: &Panel, node: &Node) -> fmt::Result {
    match node {
        Node::Static(content) => out.write_str(content.html()),
        Node::Indicator(indicator) => {
            out.write_str("<span class=\"ajane-indicator\" data-ok=\"")?;
            attribute(out, indicator.ok_html())?;
            out.write_str("\" data-fail=\"")?;
            attribute(out, indicator.fail_html())?;
            out.write_str("\">")?;
            out.write_str(indicator.ok_html())?;
            out.write_str("</span>")
        }
        Node::Element(element) => write_element(out, element, None),
        Node::Container(container) => match container.division() {
            Some(division) => {
                out.write_str("<div")?;
                common_attributes(out, division)?;
                out.write_char('>')?;
                write_nodes(out, panel, container.children())?;
                out.write_str("</div>")
            }
            None => write_nodes(out, panel, container.children()),
        },
        Node::RadioGroup(group) => {
            for &member in group.members() {
                if let Ok(element) = panel.element(member) {
                    write_element(out, element, Some(group.name()))?;
                }
            }
            Ok(())
        }
    }
}

/// `id`, visibility and enabledness.
fn common_attributes<W: Write + ?Sized>(out: &mut W, element: &Element) -> fmt::Result {
    out.write_str(" id=\"")?;
    attribute(out, element.id())?;
    out.write_char('"')?;
    if !element.is_visible() {
        out.write_str(" style=\"display:none\"")?;
    }
    if !element.is_enabled() {
        out.write_str(" disabled")?;
    }
    Ok(())
}

fn write_element<W: Write + ?Sized>(
    out: &mut W,
    element: &Element,
    group: Option<&str>,
) -> fmt::Result {
    match element.kind() {
        ElementKind::Span(span) => {
            out.write_str("<span")?;
            common_attributes(out, element)?;
            out.write_char('>')?;
            text(out, span.text(), element.html_allowed())?;
            out.write_str("</span>")
        }
        ElementKind::TextInput(input) => {
            out.write_str("<input type=\"text\"")?;
            common_attributes(out, element)?;
            // The browser counts maxlength in UTF-16 units and the capacity
            // is in bytes, so multi-byte input can still be cut by the
            // server. The truncated value is echoed back to the client.
            write!(out, " maxlength=\"{}\" value=\"", input.capacity())?;
            attribute(out, input.text())?;
            out.write_str("\" oninput=\"ajane.debounced(this.id, this.value)\"/>")
        }
        ElementKind::Slider(slider) => {
            out.write_str("<input type=\"range\"")?;
            common_attributes(out, element)?;
            write!(
                out,
                " min=\"{}\" max=\"{}\" value=\"{}\" onchange=\"ajane.send(this.id, this.value)\"/>",
                slider.min(),
                slider.max(),
                slider.value()
            )
        }
        ElementKind::ColorPicker(picker) => {
            out.write_str("<input type=\"color\"")?;
            common_attributes(out, element)?;
            write!(
                out,
                " value=\"{}\" onchange=\"ajane.send(this.id, this.value)\"/>",
                picker.color()
            )
        }
        ElementKind::PushButton(button) => {
            out.write_str("<button type=\"button\"")?;
            common_attributes(out, element)?;
            out.write_str(" onclick=\"ajane.send(this.id, '')\">")?;
            text(out, button.label(), element.html_allowed())?;
            out.write_str("</button>")
        }
        ElementKind::CheckButton(button) => {
            match group {
                Some(name) => {
                    out.write_str("<input type=\"radio\" name=\"")?;
                    attribute(out, name)?;
                    out.write_char('"')?;
                }
                None => out.write_str("<input type=\"checkbox\"")?,
            }
            common_attributes(out, element)?;
            if button.is_checked() {
                out.write_str(" checked")?;
            }
            out.write_str(" onchange=\"ajane.send(this.id, this.checked ? 't' : 'f')\"/><label for=\"")?;
            attribute(out, element.id())?;
            out.write_str("\">")?;
            text(out, button.label(), false)?;
            out.write_str("</label>")
        }
        ElementKind::OptionSelect(select) => {
            out.write_str("<select")?;
            common_attributes(out, element)?;
            out.write_str(" onchange=\"ajane.send(this.id, this.selectedIndex)\">")?;
            for (index, label) in select.labels().iter().enumerate() {
                out.write_str("<option")?;
                if select.selected_option() == Some(index) {
                    out.write_str(" selected")?;
                }
                out.write_char('>')?;
                text(out, label, false)?;
                out.write_str("</option>")?;
            }
            out.write_str("</select>")
        }
        // Rendered by its container.
        ElementKind::Division => Ok(()),
    }
}

fn attribute<W: Write + ?Sized>(out: &mut W, value: &str) -> fmt::Result {
    Escaper::new(out, Escape::ATTRIBUTE).write_str(value)
}

fn text<W: Write + ?Sized>(out: &mut W, value: &str, trusted: bool) -> fmt::Result {
    if trusted {
        out.write_str(value)
    } else {
        Escaper::new(out, Escape::HTML).write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajane_core::{PanelConfig, Rgb};

    fn demo() -> Panel {
        let mut builder = Panel::builder(PanelConfig::default());
        let title = builder.static_html("<h1>Demo</h1>").unwrap();
        let status = builder.span("status", "a < b").unwrap();
        let name = builder.text_input("name", 8).unwrap();
        let level = builder.slider("level", 0, 10, 3).unwrap();
        let tint = builder.color_picker("tint", Rgb::new(255, 0, 0)).unwrap();
        let go = builder.push_button("go", "<b>Go</b>", |_, _| {}).unwrap();
        let mode = builder.radio_group("mode", &["x", "y"], Some(1)).unwrap();
        let speed = builder.option_select("speed", &["slow", "fast"], None).unwrap();
        let section = builder
            .hideable_container("section", &[status, name])
            .unwrap();
        let link = builder.connection_indicator().unwrap();
        builder
            .build(&[title, section, level, tint, go, mode, speed, link])
            .unwrap()
    }

    #[test]
    fn renders_every_widget() {
        let mut panel = demo();
        let level = panel.find("level").unwrap();
        panel.set_enabled(level, false).unwrap();
        let page = render_page(&panel, &ServerConfig::default().with_title("A & B"));

        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("revision: 1"));
        assert!(page.contains("<h1>Demo</h1>"));
        assert!(page.contains("<div id=\"section\"><span id=\"status\">a &lt; b</span>"));
        assert!(page.contains("<input type=\"text\" id=\"name\" maxlength=\"8\" value=\"\""));
        assert!(page.contains("<input type=\"range\" id=\"level\" disabled min=\"0\" max=\"10\" value=\"3\""));
        assert!(page.contains("<input type=\"color\" id=\"tint\" value=\"#ff0000\""));
        assert!(page.contains("<b>Go</b></button>"));
        assert!(page.contains("<input type=\"radio\" name=\"mode\" id=\"mode1\" checked"));
        assert!(page.contains("<option>slow</option><option>fast</option>"));
        assert!(page.contains("class=\"ajane-indicator\""));
    }

    #[test]
    fn hidden_widgets_render_hidden() {
        let mut panel = demo();
        let section = panel.find("section").unwrap();
        panel.set_visible(section, false).unwrap();
        let page = render_page(&panel, &ServerConfig::default());
        assert!(page.contains("<div id=\"section\" style=\"display:none\">"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut out = String::new();
        attribute(&mut out, "say \"<hi>\" & go").unwrap();
        assert_eq!(out, "say &quot;&lt;hi>&quot; &amp; go");
    }
}
