//! Identifiers for widgets and arena nodes.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Maximum length of a widget id, in bytes.
pub const MAX_ID_LEN: usize = 16;

/// A short, fixed-capacity widget id.
///
/// Ids are stored inline so that they can be copied around while handling
/// a request without allocating.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    bytes: [u8; MAX_ID_LEN],
    len: u8,
}

impl WidgetId {
    /// Creates an id, rejecting empty and over-long strings.
    pub fn new(id: &str) -> CoreResult<Self> {
        if id.is_empty() {
            return Err(CoreError::EmptyId);
        }
        if id.len() > MAX_ID_LEN {
            return Err(CoreError::IdTooLong {
                id: id.to_string(),
                max: MAX_ID_LEN,
            });
        }
        let mut bytes = [0u8; MAX_ID_LEN];
        bytes[..id.len()].copy_from_slice(id.as_bytes());
        Ok(Self {
            bytes,
            len: id.len() as u8,
        })
    }

    /// Creates the id of the `index`-th member of a group: `<base><index>`.
    pub fn indexed(base: &str, index: usize) -> CoreResult<Self> {
        Self::new(&format!("{base}{index}"))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        // Always valid: built from a &str.
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({:?})", self.as_str())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for WidgetId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// Handle of a node in a panel's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u16);

impl NodeId {
    /// Creates a node handle from its arena index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        let id = WidgetId::new("slider").unwrap();
        assert_eq!(id.as_str(), "slider");
        assert_eq!(id.to_string(), "slider");
        assert!(id == *"slider");

        let id = WidgetId::new("exactly16bytes!!").unwrap();
        assert_eq!(id.as_str().len(), MAX_ID_LEN);
    }

    #[test]
    fn rejects_empty_and_long() {
        assert!(matches!(WidgetId::new(""), Err(CoreError::EmptyId)));
        assert!(matches!(
            WidgetId::new("seventeen-bytes!!"),
            Err(CoreError::IdTooLong { max: 16, .. })
        ));
    }

    #[test]
    fn indexed_ids() {
        assert_eq!(WidgetId::indexed("mode", 2).unwrap().as_str(), "mode2");
        assert!(WidgetId::indexed("fifteen-bytes!!", 10).is_err());
    }

    #[test]
    fn node_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
        assert_eq!(NodeId::new(7).index(), 7);
    }
}
