//! The demo control panel.

use ajane_core::{CoreResult, NodeId, Panel, PanelConfig, Rgb};
use tracing::warn;

/// Handles of the demo widgets the program drives.
#[derive(Debug, Clone, Copy)]
pub struct DemoIds {
    uptime: NodeId,
    celsius: NodeId,
    fahrenheit: NodeId,
    level: NodeId,
    percent: NodeId,
    mode: NodeId,
    tint: NodeId,
    swatch: NodeId,
    advanced: NodeId,
    extras: NodeId,
}

/// Builds the demo panel.
pub fn build(config: PanelConfig) -> CoreResult<(Panel, DemoIds)> {
    let mut b = Panel::builder(config);

    let title = b.static_html("<h1>Ajane demo</h1>")?;
    let link = b.connection_indicator()?;
    let uptime_label = b.static_html("<p>Uptime: ")?;
    let uptime = b.span("uptime", "0 s")?;
    let uptime_end = b.static_html("</p>")?;

    let celsius_label = b.static_html("<p>Celsius: ")?;
    let celsius = b.text_input("celsius", 8)?;
    let fahrenheit_label = b.static_html(" = Fahrenheit: ")?;
    let fahrenheit = b.span("fahrenheit", "")?;
    let celsius_end = b.static_html("</p>")?;

    let mode_label = b.static_html("<p>Mode: ")?;
    let mode = b.radio_group("mode", &["Off", "Auto", "Manual"], Some(1))?;
    let mode_end = b.static_html("</p>")?;

    let level_label = b.static_html("<p>Level: ")?;
    let level = b.slider("level", 0, 100, 50)?;
    let percent = b.span("percent", "50 %")?;
    let level_end = b.static_html("</p>")?;

    let clicks = b.span("clicks", "0")?;
    let bump = b.push_button("bump", "<b>Click me</b>", move |panel, _| {
        let count = panel
            .text(clicks)
            .ok()
            .and_then(|text| text.parse::<u32>().ok())
            .unwrap_or(0);
        if let Err(error) = panel.set_text(clicks, &(count + 1).to_string()) {
            warn!(%error, "failed to update click counter");
        }
    })?;
    let clicks_label = b.static_html(" clicks: ")?;

    let advanced = b.check_button("advanced", "Show colour", false)?;
    let tint = b.color_picker("tint", Rgb::new(0x33, 0x66, 0x99))?;
    let swatch = b.html_span("swatch", &swatch_markup(Rgb::new(0x33, 0x66, 0x99)))?;
    let extras = b.hideable_container("extras", &[tint, swatch])?;

    let mut panel = b.build(&[
        title,
        link,
        uptime_label,
        uptime,
        uptime_end,
        celsius_label,
        celsius,
        fahrenheit_label,
        fahrenheit,
        celsius_end,
        mode_label,
        mode,
        mode_end,
        level_label,
        level,
        percent,
        level_end,
        bump,
        clicks_label,
        clicks,
        advanced,
        extras,
    ])?;

    let ids = DemoIds {
        uptime,
        celsius,
        fahrenheit,
        level,
        percent,
        mode,
        tint,
        swatch,
        advanced,
        extras,
    };
    ids.sync_derived(&mut panel)?;
    panel.commit();
    Ok((panel, ids))
}

impl DemoIds {
    /// Reaction hook: recomputes every derived widget.
    pub fn react(&self, panel: &mut Panel) {
        if let Err(error) = self.sync_derived(panel) {
            warn!(%error, "demo reaction failed");
        }
    }

    /// Shows the uptime.
    pub fn tick(&self, panel: &mut Panel, seconds: u64) -> CoreResult<()> {
        panel.set_text(self.uptime, &format!("{seconds} s"))
    }

    fn sync_derived(&self, panel: &mut Panel) -> CoreResult<()> {
        let fahrenheit = panel
            .text(self.celsius)?
            .trim()
            .parse::<f64>()
            .map(|c| format!("{:.1}", c * 9.0 / 5.0 + 32.0))
            .unwrap_or_default();
        panel.set_text(self.fahrenheit, &fahrenheit)?;

        let level = panel.slider_value(self.level)?;
        panel.set_text(self.percent, &format!("{level} %"))?;

        // Only "Manual" lets the user move the slider.
        let manual = panel.selected_option(self.mode)? == Some(2);
        panel.set_enabled(self.level, manual)?;

        let color = panel.color(self.tint)?;
        panel.set_html(self.swatch, &swatch_markup(color))?;

        let advanced = panel.is_checked(self.advanced)?;
        panel.set_visible(self.extras, advanced)
    }
}

fn swatch_markup(color: Rgb) -> String {
    format!("<span style=\"display:inline-block;width:1em;height:1em;background:{color}\"></span>")
}
