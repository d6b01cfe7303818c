//! Names used on the wire.

/// Payload member carrying the revision the client should poll with next.
pub const REVISION_KEY: &str = "ArduJAXrevision";

/// Request field carrying the client's baseline revision.
pub const REVISION_FIELD: &str = "revision";

/// Client-side property toggled by the visibility slot.
pub const STYLE_DISPLAY: &str = "style.display";

/// Client-side property toggled by the enabledness slot.
pub const DISABLED: &str = "disabled";

/// Property holding the value of form inputs.
pub const VALUE: &str = "value";

/// Property holding the content of spans and button labels.
pub const INNER_HTML: &str = "innerHTML";

/// Property holding the state of check and radio buttons.
pub const CHECKED: &str = "checked";

/// Property holding the selected entry of a drop-down list.
pub const SELECTED_INDEX: &str = "selectedIndex";

/// Property holding a slider's lower bound.
pub const MIN: &str = "min";

/// Property holding a slider's upper bound.
pub const MAX: &str = "max";

/// `style.display` value for a shown element.
pub const DISPLAY_SHOWN: &str = "initial";

/// `style.display` value for a hidden element.
pub const DISPLAY_HIDDEN: &str = "none";

/// `disabled` value for a disabled element.
pub const DISABLED_ON: &str = "disabled";

/// `checked` value for a checked button. Unchecked is the empty string.
pub const CHECKED_ON: &str = "true";
