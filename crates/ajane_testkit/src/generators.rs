//! Property-based test generators using proptest.
//!
//! Provides strategies for revisions, widget values and sequences of
//! server-side mutations against a [`SpanPanel`](crate::SpanPanel).

use ajane_core::{NodeId, Panel, Revision};
use proptest::prelude::*;

/// One server-side step against a span panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Set the text of span `target`.
    SetText {
        /// Index of the span.
        target: usize,
        /// New text.
        text: String,
    },
    /// Show or hide span `target`.
    SetVisible {
        /// Index of the span.
        target: usize,
        /// New visibility.
        visible: bool,
    },
    /// Publish the pending batch.
    Commit,
}

impl Mutation {
    /// Applies the mutation to `panel`, whose spans are `spans`.
    pub fn apply(&self, panel: &mut Panel, spans: &[NodeId]) {
        match self {
            Mutation::SetText { target, text } => {
                panel
                    .set_text(spans[*target], text)
                    .expect("Failed to set text");
            }
            Mutation::SetVisible { target, visible } => {
                panel
                    .set_visible(spans[*target], *visible)
                    .expect("Failed to set visibility");
            }
            Mutation::Commit => {
                panel.commit();
            }
        }
    }

    /// Index of the span the mutation touches, if any.
    pub fn target(&self) -> Option<usize> {
        match self {
            Mutation::SetText { target, .. } | Mutation::SetVisible { target, .. } => Some(*target),
            Mutation::Commit => None,
        }
    }
}

/// Strategy for any revision on the ring.
pub fn revision_strategy() -> impl Strategy<Value = Revision> {
    any::<u16>().prop_map(Revision::new)
}

/// Strategy for valid widget ids.
pub fn widget_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for widget text, including markup and quote characters.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9 ]{0,12}").expect("Invalid regex"),
        prop::string::string_regex("[<>&\"'\\\\a-z]{0,12}").expect("Invalid regex"),
        ".{0,12}",
    ]
}

/// Strategy for one mutation against `spans` spans.
pub fn mutation_strategy(spans: usize) -> impl Strategy<Value = Mutation> {
    prop_oneof![
        3 => (0..spans, text_strategy()).prop_map(|(target, text)| Mutation::SetText { target, text }),
        1 => (0..spans, any::<bool>())
            .prop_map(|(target, visible)| Mutation::SetVisible { target, visible }),
        1 => Just(Mutation::Commit),
    ]
}

/// Strategy for a sequence of up to `max_len` mutations against `spans`
/// spans.
pub fn mutations_strategy(spans: usize, max_len: usize) -> impl Strategy<Value = Vec<Mutation>> {
    prop::collection::vec(mutation_strategy(spans), 0..max_len)
}

/// Strategy for text-input values, some longer than typical capacities.
pub fn input_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 äöü€]{0,24}").expect("Invalid regex")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn mutations_stay_in_range() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let mutations = mutations_strategy(3, 10)
                .new_tree(&mut runner)
                .unwrap()
                .current();
            assert!(mutations.iter().filter_map(Mutation::target).all(|t| t < 3));
        }
    }

    #[test]
    fn ids_are_valid() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let id = widget_id_strategy().new_tree(&mut runner).unwrap().current();
            assert!(ajane_core::WidgetId::new(&id).is_ok());
        }
    }
}
