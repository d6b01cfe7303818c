//! Widgets: addressable, stateful leaf elements.
//!
//! Every widget carries one change stamp per property slot. Setters only
//! stamp a slot when its value actually changes, which keeps diffs minimal.

use crate::clock::ChangeClock;
use crate::id::{NodeId, WidgetId};
use crate::panel::Panel;
use crate::property::{Property, PropertyFlags, PropertyValue, MAX_PROPERTIES};
use ajane_protocol::{names, parse_flag, parse_number, Baseline, Revision, Rgb};
use std::fmt;
use tracing::{trace, warn};

/// Callback invoked when a push button was clicked in the client.
///
/// Runs after all inbound fields of the request are applied and before the
/// panel commits, so anything it changes is part of the same revision.
pub type ButtonCallback = Box<dyn FnMut(&mut Panel, NodeId) + Send>;

/// Outcome of applying one inbound field to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inbound {
    /// The widget does not accept client input.
    Ignored,
    /// The value matched the stored state.
    Unchanged,
    /// The stored state changed, or the value had to be truncated/clamped.
    Updated,
    /// The value was malformed and skipped.
    Rejected,
    /// A push button was clicked.
    Clicked,
    /// A radio member reported its state; the group decides.
    Toggled(bool),
}

/// A span whose content is set by the server.
#[derive(Debug, Clone, Default)]
pub struct MutableSpan {
    text: String,
}

impl MutableSpan {
    /// Current content.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A single-line text field with a fixed capacity.
#[derive(Debug, Clone)]
pub struct TextInput {
    text: String,
    capacity: usize,
}

impl TextInput {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
        }
    }

    /// Current content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maximum content length in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copies `value`, truncated to capacity, into the buffer without
    /// reallocating. Returns `(changed, truncated)`.
    fn store(&mut self, value: &str) -> (bool, bool) {
        let kept = truncate_to_boundary(value, self.capacity);
        let changed = replace_string(&mut self.text, kept);
        (changed, kept.len() != value.len())
    }
}

/// A range slider.
#[derive(Debug, Clone)]
pub struct Slider {
    min: i16,
    max: i16,
    value: i16,
}

impl Slider {
    pub(crate) fn new(min: i16, max: i16, initial: i16) -> Self {
        Self {
            min,
            max,
            value: initial.clamp(min, max),
        }
    }

    /// Lower bound.
    pub fn min(&self) -> i16 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> i16 {
        self.max
    }

    /// Current value.
    pub fn value(&self) -> i16 {
        self.value
    }

    /// Returns `(changed, clamped)`.
    fn store(&mut self, value: i16) -> (bool, bool) {
        let clamped = value.clamp(self.min, self.max);
        let changed = clamped != self.value;
        self.value = clamped;
        (changed, clamped != value)
    }
}

/// A colour picker.
#[derive(Debug, Clone)]
pub struct ColorPicker {
    color: Rgb,
}

impl ColorPicker {
    /// Current colour.
    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// A push button that runs a callback when clicked.
pub struct PushButton {
    label: String,
    clicked: bool,
    callback: Option<ButtonCallback>,
}

impl PushButton {
    /// Current label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true if a click callback is installed.
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for PushButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushButton")
            .field("label", &self.label)
            .field("clicked", &self.clicked)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Membership of a check button in a radio group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLink {
    /// The owning group.
    pub group: NodeId,
    /// Position of the member within the group.
    pub index: u16,
}

/// A check box, or a radio button when it belongs to a group.
#[derive(Debug, Clone)]
pub struct CheckButton {
    label: String,
    checked: bool,
    group: Option<GroupLink>,
}

impl CheckButton {
    /// The label shown next to the box.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current state.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// The radio group this button belongs to, if any.
    pub fn group(&self) -> Option<GroupLink> {
        self.group
    }
}

/// A drop-down list.
#[derive(Debug, Clone)]
pub struct OptionSelect {
    labels: Vec<String>,
    selected: i16,
}

impl OptionSelect {
    /// Option labels, in display order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the selected option, if any.
    pub fn selected_option(&self) -> Option<usize> {
        usize::try_from(self.selected).ok()
    }

    /// Out-of-range indices select nothing. Returns `(changed, altered)`.
    fn store(&mut self, index: i16) -> (bool, bool) {
        let normalized = match usize::try_from(index) {
            Ok(i) if i < self.labels.len() => index,
            _ => -1,
        };
        let changed = normalized != self.selected;
        self.selected = normalized;
        (changed, normalized != index)
    }
}

/// The kind-specific part of a widget.
#[derive(Debug)]
pub enum ElementKind {
    /// Server-controlled text or markup.
    Span(MutableSpan),
    /// Text field.
    TextInput(TextInput),
    /// Range slider.
    Slider(Slider),
    /// Colour picker.
    ColorPicker(ColorPicker),
    /// Push button.
    PushButton(PushButton),
    /// Check box or radio button.
    CheckButton(CheckButton),
    /// Drop-down list.
    OptionSelect(OptionSelect),
    /// The element of a hideable container; it has no value of its own.
    Division,
}

impl ElementKind {
    pub(crate) fn span(text: &str) -> Self {
        ElementKind::Span(MutableSpan {
            text: text.to_string(),
        })
    }

    pub(crate) fn text_input(capacity: usize) -> Self {
        ElementKind::TextInput(TextInput::new(capacity))
    }

    pub(crate) fn slider(min: i16, max: i16, initial: i16) -> Self {
        ElementKind::Slider(Slider::new(min, max, initial))
    }

    pub(crate) fn color_picker(color: Rgb) -> Self {
        ElementKind::ColorPicker(ColorPicker { color })
    }

    pub(crate) fn push_button(label: &str, callback: Option<ButtonCallback>) -> Self {
        ElementKind::PushButton(PushButton {
            label: label.to_string(),
            clicked: false,
            callback,
        })
    }

    pub(crate) fn check_button(label: &str, checked: bool, group: Option<GroupLink>) -> Self {
        ElementKind::CheckButton(CheckButton {
            label: label.to_string(),
            checked,
            group,
        })
    }

    pub(crate) fn option_select(labels: &[&str], selected: i16) -> Self {
        let mut select = OptionSelect {
            labels: labels.iter().map(|label| label.to_string()).collect(),
            selected: -1,
        };
        select.store(selected);
        ElementKind::OptionSelect(select)
    }

    /// Human-readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Span(_) => "span",
            ElementKind::TextInput(_) => "text input",
            ElementKind::Slider(_) => "slider",
            ElementKind::ColorPicker(_) => "color picker",
            ElementKind::PushButton(_) => "push button",
            ElementKind::CheckButton(_) => "check button",
            ElementKind::OptionSelect(_) => "option select",
            ElementKind::Division => "division",
        }
    }
}

/// A single addressable, stateful widget.
#[derive(Debug)]
pub struct Element {
    id: WidgetId,
    flags: PropertyFlags,
    stamps: [Revision; MAX_PROPERTIES],
    last_changed: Revision,
    kind: ElementKind,
}

impl Element {
    pub(crate) fn new(id: WidgetId, kind: ElementKind, flags: PropertyFlags, initial: Revision) -> Self {
        Self {
            id,
            flags,
            stamps: [initial; MAX_PROPERTIES],
            last_changed: initial,
            kind,
        }
    }

    /// The widget id.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// The widget id, by value.
    pub fn widget_id(&self) -> WidgetId {
        self.id
    }

    /// The kind-specific state.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Boolean property flags.
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Returns true if the widget is shown.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(PropertyFlags::VISIBLE)
    }

    /// Returns true if the widget accepts input.
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(PropertyFlags::ENABLED)
    }

    /// Returns true if the widget's text is sent as trusted markup.
    pub fn html_allowed(&self) -> bool {
        self.flags.contains(PropertyFlags::HTML_ALLOWED)
    }

    /// Revision at which any property was last touched.
    pub fn last_changed(&self) -> Revision {
        self.last_changed
    }

    /// Revision at which `property` was last touched.
    pub fn stamp(&self, property: Property) -> Revision {
        self.stamps[property.index()]
    }

    /// Client-side property name of a slot, or `None` if this kind does not
    /// use the slot.
    pub fn property_name(&self, property: Property) -> Option<&'static str> {
        match property {
            Property::VISIBILITY => Some(names::STYLE_DISPLAY),
            Property::ENABLEDNESS => Some(names::DISABLED),
            Property::VALUE => match self.kind {
                ElementKind::Span(_) | ElementKind::PushButton(_) => Some(names::INNER_HTML),
                ElementKind::TextInput(_) | ElementKind::Slider(_) | ElementKind::ColorPicker(_) => {
                    Some(names::VALUE)
                }
                ElementKind::CheckButton(_) => Some(names::CHECKED),
                ElementKind::OptionSelect(_) => Some(names::SELECTED_INDEX),
                ElementKind::Division => None,
            },
            Property::MIN if matches!(self.kind, ElementKind::Slider(_)) => Some(names::MIN),
            Property::MAX if matches!(self.kind, ElementKind::Slider(_)) => Some(names::MAX),
            _ => None,
        }
    }

    /// Current serialized value of a slot.
    pub fn render_value(&self, property: Property) -> Option<PropertyValue<'_>> {
        match property {
            Property::VISIBILITY => Some(PropertyValue::Text(if self.is_visible() {
                names::DISPLAY_SHOWN
            } else {
                names::DISPLAY_HIDDEN
            })),
            Property::ENABLEDNESS => Some(PropertyValue::Text(if self.is_enabled() {
                ""
            } else {
                names::DISABLED_ON
            })),
            Property::VALUE => match &self.kind {
                ElementKind::Span(span) => Some(PropertyValue::Text(&span.text)),
                ElementKind::TextInput(input) => Some(PropertyValue::Text(&input.text)),
                ElementKind::Slider(slider) => Some(PropertyValue::Number(slider.value)),
                ElementKind::ColorPicker(picker) => Some(PropertyValue::Color(picker.color)),
                ElementKind::PushButton(button) => Some(PropertyValue::Text(&button.label)),
                ElementKind::CheckButton(button) => Some(PropertyValue::Text(if button.checked {
                    names::CHECKED_ON
                } else {
                    ""
                })),
                ElementKind::OptionSelect(select) => Some(PropertyValue::Number(select.selected)),
                ElementKind::Division => None,
            },
            Property::MIN => match &self.kind {
                ElementKind::Slider(slider) => Some(PropertyValue::Number(slider.min)),
                _ => None,
            },
            Property::MAX => match &self.kind {
                ElementKind::Slider(slider) => Some(PropertyValue::Number(slider.max)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns true if the value of a slot may contain markup that must be
    /// escaped before the client renders it.
    pub fn needs_escaping(&self, property: Property) -> bool {
        property == Property::VALUE
            && matches!(self.kind, ElementKind::Span(_) | ElementKind::PushButton(_))
            && !self.html_allowed()
    }

    /// Returns true if any property changed after `baseline`.
    pub fn has_changed_since(&self, baseline: Baseline, clock: &ChangeClock) -> bool {
        self.changed_properties(baseline, clock).next().is_some()
    }

    /// Slots that changed after `baseline`, in emission order.
    pub fn changed_properties<'a>(
        &'a self,
        baseline: Baseline,
        clock: &'a ChangeClock,
    ) -> impl Iterator<Item = Property> + 'a {
        Property::EMISSION_ORDER.into_iter().filter(move |property| {
            self.property_name(*property).is_some()
                && clock.has_changed_since(self.stamps[property.index()], baseline)
        })
    }

    pub(crate) fn mark_property_changed(&mut self, property: Property, clock: &mut ChangeClock) {
        let revision = clock.mark_dirty();
        self.stamps[property.index()] = revision;
        self.last_changed = revision;
        trace!(id = %self.id, slot = property.index(), %revision, "property changed");
    }

    /// Sets visibility or enabledness. Returns true if the state changed.
    pub(crate) fn set_basic_property(
        &mut self,
        property: Property,
        status: bool,
        clock: &mut ChangeClock,
    ) -> bool {
        let flag = match property {
            Property::VISIBILITY => PropertyFlags::VISIBLE,
            Property::ENABLEDNESS => PropertyFlags::ENABLED,
            _ => return false,
        };
        if self.flags.contains(flag) == status {
            return false;
        }
        self.flags.set(flag, status);
        self.mark_property_changed(property, clock);
        true
    }

    /// Sets the text of a span, text input or push button. Returns false if
    /// this kind has no text.
    pub(crate) fn set_text(&mut self, text: &str, allow_html: bool, clock: &mut ChangeClock) -> bool {
        let html_changed = self.html_allowed() != allow_html;
        let changed = match &mut self.kind {
            ElementKind::Span(span) => replace_string(&mut span.text, text) | html_changed,
            ElementKind::PushButton(button) => replace_string(&mut button.label, text) | html_changed,
            ElementKind::TextInput(input) => input.store(text).0,
            _ => return false,
        };
        if matches!(self.kind, ElementKind::Span(_) | ElementKind::PushButton(_)) {
            self.flags.set(PropertyFlags::HTML_ALLOWED, allow_html);
        }
        if changed {
            self.mark_property_changed(Property::VALUE, clock);
        }
        true
    }

    /// Sets a slider value or drop-down selection. Returns false if this
    /// kind has no numeric value.
    pub(crate) fn set_number(&mut self, value: i16, clock: &mut ChangeClock) -> bool {
        let changed = match &mut self.kind {
            ElementKind::Slider(slider) => slider.store(value).0,
            ElementKind::OptionSelect(select) => select.store(value).0,
            _ => return false,
        };
        if changed {
            self.mark_property_changed(Property::VALUE, clock);
        }
        true
    }

    /// Changes a slider's range, clamping its value. The caller validates
    /// `min <= max`.
    pub(crate) fn set_range(&mut self, min: i16, max: i16, clock: &mut ChangeClock) -> bool {
        let ElementKind::Slider(slider) = &mut self.kind else {
            return false;
        };
        let min_changed = slider.min != min;
        let max_changed = slider.max != max;
        slider.min = min;
        slider.max = max;
        let value_changed = slider.store(slider.value).0;

        if min_changed {
            self.mark_property_changed(Property::MIN, clock);
        }
        if max_changed {
            self.mark_property_changed(Property::MAX, clock);
        }
        if value_changed {
            self.mark_property_changed(Property::VALUE, clock);
        }
        true
    }

    /// Sets a colour picker. Returns false for other kinds.
    pub(crate) fn set_color(&mut self, color: Rgb, clock: &mut ChangeClock) -> bool {
        let ElementKind::ColorPicker(picker) = &mut self.kind else {
            return false;
        };
        if picker.color != color {
            picker.color = color;
            self.mark_property_changed(Property::VALUE, clock);
        }
        true
    }

    /// Sets a check button without any group logic. Returns false for other
    /// kinds.
    pub(crate) fn set_checked(&mut self, checked: bool, clock: &mut ChangeClock) -> bool {
        let ElementKind::CheckButton(button) = &mut self.kind else {
            return false;
        };
        if button.checked != checked {
            button.checked = checked;
            self.mark_property_changed(Property::VALUE, clock);
        }
        true
    }

    /// Applies one raw inbound value from the client.
    ///
    /// Values that had to be truncated or clamped are stamped even if the
    /// stored state did not change, so the client is corrected.
    pub(crate) fn apply_inbound(&mut self, raw: &str, clock: &mut ChangeClock) -> Inbound {
        let touched = match &mut self.kind {
            ElementKind::Span(_) | ElementKind::Division => return Inbound::Ignored,
            ElementKind::TextInput(input) => {
                let (changed, truncated) = input.store(raw);
                if truncated {
                    trace!(id = %self.id, capacity = input.capacity, "truncated inbound text");
                }
                changed || truncated
            }
            ElementKind::Slider(slider) => match parse_number(raw) {
                Ok(value) => {
                    let (changed, clamped) = slider.store(value);
                    changed || clamped
                }
                Err(error) => {
                    warn!(id = %self.id, %error, "ignoring malformed slider value");
                    return Inbound::Rejected;
                }
            },
            ElementKind::ColorPicker(picker) => match raw.parse::<Rgb>() {
                Ok(color) => {
                    let changed = picker.color != color;
                    picker.color = color;
                    changed
                }
                Err(error) => {
                    warn!(id = %self.id, %error, "ignoring malformed colour");
                    return Inbound::Rejected;
                }
            },
            ElementKind::PushButton(button) => {
                button.clicked = true;
                return Inbound::Clicked;
            }
            ElementKind::CheckButton(button) => {
                let checked = parse_flag(raw);
                if button.group.is_some() {
                    return Inbound::Toggled(checked);
                }
                let changed = button.checked != checked;
                button.checked = checked;
                changed
            }
            ElementKind::OptionSelect(select) => match parse_number(raw) {
                Ok(index) => {
                    let (changed, altered) = select.store(index);
                    changed || altered
                }
                Err(error) => {
                    warn!(id = %self.id, %error, "ignoring malformed selection");
                    return Inbound::Rejected;
                }
            },
        };

        if touched {
            self.mark_property_changed(Property::VALUE, clock);
            Inbound::Updated
        } else {
            Inbound::Unchanged
        }
    }

    /// Takes a pending click, returning the callback to run (if any).
    pub(crate) fn take_click(&mut self) -> Option<Option<ButtonCallback>> {
        match &mut self.kind {
            ElementKind::PushButton(button) if button.clicked => {
                button.clicked = false;
                Some(button.callback.take())
            }
            _ => None,
        }
    }

    /// Puts a callback back after it ran.
    pub(crate) fn restore_callback(&mut self, callback: ButtonCallback) {
        if let ElementKind::PushButton(button) = &mut self.kind {
            button.callback = Some(callback);
        }
    }
}

/// Replaces `target` with `value`, returning true if it differed.
fn replace_string(target: &mut String, value: &str) -> bool {
    if target == value {
        return false;
    }
    target.clear();
    target.push_str(value);
    true
}

/// Longest prefix of `value` that fits `max` bytes and ends on a character
/// boundary.
fn truncate_to_boundary(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
