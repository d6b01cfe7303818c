//! Property tests of the synchronization engine.

use ajane_core::{ChangeClock, Revision};
use ajane_protocol::names::{DISPLAY_HIDDEN, DISPLAY_SHOWN, INNER_HTML, STYLE_DISPLAY};
use ajane_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

const SPANS: usize = 4;

/// Expected client-visible state of a span panel.
#[derive(Debug, Clone)]
struct Model {
    texts: Vec<String>,
    visible: Vec<bool>,
    changed: BTreeSet<usize>,
}

impl Model {
    fn new(spans: usize) -> Self {
        Self {
            texts: vec![String::new(); spans],
            visible: vec![true; spans],
            changed: BTreeSet::new(),
        }
    }

    fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::SetText { target, text } => {
                if self.texts[*target] != *text {
                    self.texts[*target] = text.clone();
                    self.changed.insert(*target);
                }
            }
            Mutation::SetVisible { target, visible } => {
                if self.visible[*target] != *visible {
                    self.visible[*target] = *visible;
                    self.changed.insert(*target);
                }
            }
            Mutation::Commit => {}
        }
    }
}

fn escaped(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

fn ids(diff: &ajane_protocol::DiffPayload) -> BTreeSet<usize> {
    diff.records
        .keys()
        .map(|id| id[1..].parse().unwrap())
        .collect()
}

proptest! {
    #[test]
    fn visible_revision_is_monotonic(
        start in revision_strategy(),
        steps in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut clock = ChangeClock::new(start);
        for dirty in steps {
            let before = clock.visible_revision();
            if dirty {
                clock.mark_dirty();
            } else {
                clock.commit();
            }
            let after = clock.visible_revision();
            prop_assert!(after.steps_since(before) <= 1);
            let pending = clock.pending_revision().steps_since(after);
            prop_assert!(pending <= 1);
        }
    }

    #[test]
    fn diff_is_minimal(mutations in mutations_strategy(SPANS, 24)) {
        let fixture = span_panel(SPANS);
        let mut harness = PanelHarness::new(fixture.panel);
        let since = harness.baseline();
        let mut model = Model::new(SPANS);

        for mutation in &mutations {
            mutation.apply(&mut harness.panel, &fixture.spans);
            model.apply(mutation);
        }
        harness.panel.commit();

        let diff = harness.poll_since(since);
        prop_assert_eq!(ids(&diff), model.changed.clone());
        for index in &model.changed {
            let id = SpanPanel::id(*index);
            // A record carries only what changed, but every value it carries
            // is the latest one.
            if let Some(text) = diff.property(&id, INNER_HTML) {
                prop_assert_eq!(text, escaped(&model.texts[*index]));
            }
            if let Some(display) = diff.property(&id, STYLE_DISPLAY) {
                let expected = if model.visible[*index] { DISPLAY_SHOWN } else { DISPLAY_HIDDEN };
                prop_assert_eq!(display, expected);
            }
        }
    }

    #[test]
    fn batches_are_atomic(
        before in mutations_strategy(SPANS, 12),
        batch in prop::collection::vec((0..SPANS, text_strategy()), 1..8),
    ) {
        let fixture = span_panel(SPANS);
        let mut harness = PanelHarness::new(fixture.panel);
        for mutation in &before {
            mutation.apply(&mut harness.panel, &fixture.spans);
        }
        harness.panel.commit();
        let since = harness.panel.revision();
        let seen_before = harness.poll_since(Some(since));
        prop_assert!(seen_before.is_empty());

        let mut touched = BTreeSet::new();
        for (target, text) in &batch {
            let old = harness.panel.text(fixture.spans[*target]).unwrap().to_string();
            harness.panel.set_text(fixture.spans[*target], text).unwrap();
            if old != *text {
                touched.insert(*target);
            }
        }

        // No part of the batch is visible before the commit, from any
        // baseline.
        prop_assert!(harness.poll_since(Some(since)).is_empty());
        for baseline in [Some(Revision::INITIAL), None] {
            let diff = harness.poll_since(baseline);
            for index in &touched {
                prop_assert!(diff.property(&SpanPanel::id(*index), INNER_HTML).is_none());
            }
        }

        harness.panel.commit();
        let diff = harness.poll_since(Some(since));
        prop_assert_eq!(ids(&diff), touched);
    }

    #[test]
    fn groups_stay_exclusive(
        options in 1usize..6,
        selections in prop::collection::vec(0usize..8, 1..12),
    ) {
        let mut fixture = radio_panel(options);
        for selection in selections {
            fixture.panel.select_option(fixture.group, Some(selection)).unwrap();
            let checked = fixture.checked();
            let count = checked.iter().filter(|c| **c).count();
            if selection < options {
                prop_assert_eq!(count, 1);
                prop_assert!(checked[selection]);
                prop_assert_eq!(fixture.panel.selected_option(fixture.group).unwrap(), Some(selection));
            } else {
                prop_assert_eq!(count, 0);
                prop_assert_eq!(fixture.panel.selected_option(fixture.group).unwrap(), None);
            }
        }
    }

    #[test]
    fn inbound_members_stay_exclusive(
        toggles in prop::collection::vec((0usize..3, any::<bool>()), 1..12),
    ) {
        let fixture = radio_panel(3);
        let group = fixture.group;
        let members = fixture.members.clone();
        let mut harness = PanelHarness::new(fixture.panel);
        for (member, checked) in toggles {
            let id = format!("mode{member}");
            harness.update(&[(id.as_str(), if checked { "t" } else { "f" })]);
            let states: Vec<bool> = members
                .iter()
                .map(|m| harness.panel.is_checked(*m).unwrap())
                .collect();
            prop_assert!(states.iter().filter(|c| **c).count() <= 1);
            let selected = harness.panel.selected_option(group).unwrap();
            prop_assert_eq!(selected, states.iter().position(|c| *c));
        }
    }

    #[test]
    fn polls_are_idempotent(
        mutations in mutations_strategy(SPANS, 16),
        since in prop::option::of(revision_strategy()),
    ) {
        let fixture = span_panel(SPANS);
        let mut panel = fixture.panel;
        for mutation in &mutations {
            mutation.apply(&mut panel, &fixture.spans);
        }
        let first = panel.render_payload(since);
        let second = panel.render_payload(since);
        prop_assert_eq!(&first, &second);
        decode(&first);
    }

    #[test]
    fn updates_round_trip(value in input_strategy()) {
        let fixture = scenario_panel();
        let mut harness = PanelHarness::new(fixture.panel);
        let since = harness.baseline();
        harness.update(&[("name", value.as_str())]);

        let stored = harness.panel.text(fixture.name).unwrap().to_string();
        prop_assert!(stored.len() <= 8);
        prop_assert!(value.starts_with(&stored));

        let diff = harness.poll_since(since);
        if value.is_empty() {
            prop_assert!(diff.record("name").is_none());
        } else {
            prop_assert_eq!(diff.property("name", "value"), Some(stored.as_str()));
        }
    }
}
