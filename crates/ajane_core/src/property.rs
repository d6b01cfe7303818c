//! Property slots of a widget.

use ajane_protocol::Rgb;
use bitflags::bitflags;
use std::fmt;

/// Number of property slots tracked per widget.
pub const MAX_PROPERTIES: usize = 5;

/// A property slot.
///
/// Slots 0-2 are shared by every widget; kinds may define further slots
/// starting at [`Property::FIRST_ELEMENT_SPECIFIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Property(u8);

impl Property {
    /// Shown or hidden.
    pub const VISIBILITY: Self = Self(0);
    /// Interactive or disabled.
    pub const ENABLEDNESS: Self = Self(1);
    /// The kind-specific main value.
    pub const VALUE: Self = Self(2);
    /// First slot available to individual kinds.
    pub const FIRST_ELEMENT_SPECIFIC: Self = Self(3);
    /// Slider lower bound.
    pub const MIN: Self = Self(3);
    /// Slider upper bound.
    pub const MAX: Self = Self(4);

    /// Order in which changed properties are emitted. Range slots precede
    /// the value so that clients never clamp a new value to an old range.
    pub const EMISSION_ORDER: [Property; MAX_PROPERTIES] = [
        Self::VISIBILITY,
        Self::ENABLEDNESS,
        Self::MIN,
        Self::MAX,
        Self::VALUE,
    ];

    /// Returns the slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Boolean properties of a widget.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PropertyFlags: u8 {
        /// The widget is shown.
        const VISIBLE = 1 << 0;
        /// The widget accepts input.
        const ENABLED = 1 << 1;
        /// The widget's text is trusted markup and is sent unescaped.
        const HTML_ALLOWED = 1 << 7;
    }
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

/// The current value of a property, ready to be serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    /// A string.
    Text(&'a str),
    /// An integer.
    Number(i16),
    /// A colour, written as `#rrggbb`.
    Color(Rgb),
}

impl fmt::Display for PropertyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Number(value) => write!(f, "{}", value),
            PropertyValue::Color(color) => write!(f, "{}", color),
        }
    }
}
