//! End-to-end scenarios driven through the polling harness.

use ajane_core::{Panel, PanelConfig, Revision, SyncOutcome};
use ajane_protocol::names::{CHECKED, DISPLAY_HIDDEN, INNER_HTML, STYLE_DISPLAY, VALUE};
use ajane_testkit::prelude::*;

#[test]
fn text_input_updates_and_truncates() {
    let fixture = scenario_panel();
    let mut harness = PanelHarness::new(fixture.panel);

    harness.update(&[("name", "Alice")]);
    assert_eq!(
        harness.last_raw(),
        r#"{"ArduJAXrevision":2,"name":{"value":"Alice"}}"#
    );
    assert_eq!(harness.panel.text(fixture.name).unwrap(), "Alice");

    let diff = harness.update(&[("name", "AliceAndBob")]);
    assert_eq!(harness.panel.text(fixture.name).unwrap(), "AliceAnd");
    assert_eq!(diff.revision, Revision::new(3));
    assert_eq!(diff.property("name", VALUE), Some("AliceAnd"));
    assert!(diff.record("ok").is_none());
}

#[test]
fn out_of_range_selection_clears_group() {
    let mut fixture = radio_panel(3);
    fixture.panel.select_option(fixture.group, Some(1)).unwrap();
    assert_eq!(fixture.checked(), vec![false, true, false]);

    fixture.panel.select_option(fixture.group, Some(5)).unwrap();
    assert_eq!(fixture.panel.selected_option(fixture.group).unwrap(), None);
    assert_eq!(fixture.checked(), vec![false, false, false]);
}

#[test]
fn selection_diff_lists_only_flipped_members() {
    let mut fixture = radio_panel(3);
    fixture.panel.select_option(fixture.group, Some(0)).unwrap();
    fixture.panel.commit();
    let mut harness = PanelHarness::new(fixture.panel);

    let diff = harness.update(&[("mode2", "t")]);
    assert_eq!(diff.property("mode0", CHECKED), Some(""));
    assert_eq!(diff.property("mode2", CHECKED), Some("true"));
    assert!(diff.record("mode1").is_none());
}

#[test]
fn hidden_section_is_one_record() {
    let mut fixture = nested_panel();
    fixture.panel.set_visible(fixture.section, false).unwrap();
    let mut harness = PanelHarness::new(fixture.panel);
    // Not committed yet.
    assert!(harness.poll().is_empty());

    harness.panel.commit();
    let diff = harness.poll();
    assert_eq!(diff.records.len(), 1);
    assert_eq!(diff.property("section", STYLE_DISPLAY), Some(DISPLAY_HIDDEN));
    assert!(harness.panel.element(fixture.inner).unwrap().is_visible());
}

#[test]
fn disabling_a_section_reaches_every_widget() {
    let mut fixture = nested_panel();
    fixture.panel.set_enabled(fixture.section, false).unwrap();
    fixture.panel.commit();

    let diff = PanelHarness::new(fixture.panel).poll_since(Some(Revision::INITIAL));
    let ids: Vec<&str> = diff.records.keys().map(String::as_str).collect();
    assert_eq!(
        ids,
        vec!["inner", "level", "pick0", "pick1", "pick2", "section"]
    );
    assert!(diff.record("outer").is_none());
}

#[test]
fn update_sees_its_own_side_effects() {
    let fixture = nested_panel();
    let (inner, level) = (fixture.inner, fixture.level);
    let mut harness = PanelHarness::new(fixture.panel);

    let (outcome, diff) = harness.request(&[("level", "250"), ("pick1", "t")], |panel| {
        let value = panel.slider_value(level).unwrap();
        panel.set_text(inner, &format!("level {value}")).unwrap();
    });

    assert_eq!(
        outcome,
        SyncOutcome::Updated {
            revision: Revision::new(2),
            fields: 2
        }
    );
    // Clamped to the slider's range and echoed back.
    assert_eq!(diff.property("level", VALUE), Some("100"));
    assert_eq!(diff.property("inner", INNER_HTML), Some("level 100"));
    assert_eq!(diff.property("pick0", CHECKED), Some(""));
    assert_eq!(diff.property("pick1", CHECKED), Some("true"));
}

#[test]
fn clients_at_different_baselines() {
    let fixture = span_panel(3);
    let mut panel = fixture.panel;

    panel.set_text(fixture.spans[0], "one").unwrap();
    let r2 = panel.commit();
    panel.set_text(fixture.spans[1], "two").unwrap();
    let r3 = panel.commit();
    panel.set_text(fixture.spans[2], "three").unwrap();
    panel.commit();

    let mut harness = PanelHarness::new(panel);
    assert_eq!(harness.poll_since(Some(Revision::INITIAL)).records.len(), 3);
    assert_eq!(harness.poll_since(Some(r2)).records.len(), 2);
    let diff = harness.poll_since(Some(r3));
    assert_eq!(diff.records.len(), 1);
    assert_eq!(diff.property("s2", INNER_HTML), Some("three"));
}

#[test]
fn wraparound_keeps_updates() {
    let config = PanelConfig::default().initial_revision(Revision::new(u16::MAX));
    let mut builder = Panel::builder(config);
    let a = builder.span("a", "").unwrap();
    let b = builder.span("b", "").unwrap();
    let mut panel = builder.build(&[a, b]).unwrap();

    panel.set_text(a, "x").unwrap();
    assert_eq!(panel.commit(), Revision::new(0));
    panel.set_text(b, "y").unwrap();
    assert_eq!(panel.commit(), Revision::new(1));

    let mut harness = PanelHarness::new(panel);
    let diff = harness.poll_since(Some(Revision::new(u16::MAX)));
    assert_eq!(diff.property("a", INNER_HTML), Some("x"));
    assert_eq!(diff.property("b", INNER_HTML), Some("y"));

    let diff = harness.poll_since(Some(Revision::new(0)));
    assert!(diff.record("a").is_none());
    assert_eq!(diff.property("b", INNER_HTML), Some("y"));

    // A baseline from the future cannot be ordered; everything is resent.
    let diff = harness.poll_since(Some(Revision::new(500)));
    assert_eq!(diff.records.len(), 2);
}
