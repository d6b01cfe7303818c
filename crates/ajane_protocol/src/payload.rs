//! Diff payload encoding and decoding.
//!
//! A payload is a flat JSON object:
//!
//! ```text
//! {"ArduJAXrevision":2,"name":{"value":"Alice"},"ok":{"checked":"true"}}
//! ```
//!
//! The revision member always comes first, followed by one record per
//! changed widget, in tree order.

use crate::error::ProtocolResult;
use crate::filter::write_filtered;
use crate::names::REVISION_KEY;
use crate::revision::Revision;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Streaming encoder for diff payloads.
///
/// The encoder writes directly into its sink and never allocates.
pub struct PayloadEncoder<'w, W: Write + ?Sized> {
    out: &'w mut W,
    enclosed: bool,
    first_property: bool,
    records: usize,
}

impl<'w, W: Write + ?Sized> PayloadEncoder<'w, W> {
    /// Starts a payload object and writes the revision member.
    ///
    /// Records written afterwards must pass `first = false`.
    pub fn begin(out: &'w mut W, revision: Revision) -> Result<Self, fmt::Error> {
        out.write_char('{')?;
        write_filtered(out, REVISION_KEY, true, false)?;
        write!(out, ":{}", revision)?;
        Ok(Self {
            out,
            enclosed: true,
            first_property: true,
            records: 0,
        })
    }

    /// Starts a bare, comma-separated record list without enclosing braces.
    pub fn records_only(out: &'w mut W) -> Self {
        Self {
            out,
            enclosed: false,
            first_property: true,
            records: 0,
        }
    }

    /// Opens the record for widget `id`.
    ///
    /// `first` must be true only for the very first member of the whole
    /// output; otherwise a separating comma is written.
    pub fn begin_record(&mut self, id: &str, first: bool) -> fmt::Result {
        if !first {
            self.out.write_char(',')?;
        }
        write_filtered(self.out, id, true, false)?;
        self.out.write_str(":{")?;
        self.first_property = true;
        self.records += 1;
        Ok(())
    }

    /// Writes one `"name":"value"` pair into the open record.
    pub fn property<V: fmt::Display>(
        &mut self,
        name: &str,
        value: V,
        html_escaped: bool,
    ) -> fmt::Result {
        if !self.first_property {
            self.out.write_char(',')?;
        }
        self.first_property = false;
        write_filtered(self.out, name, true, false)?;
        self.out.write_char(':')?;
        write_filtered(self.out, value, true, html_escaped)
    }

    /// Closes the open record.
    pub fn end_record(&mut self) -> fmt::Result {
        self.out.write_char('}')
    }

    /// Number of records opened so far.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Finishes the payload.
    pub fn finish(self) -> fmt::Result {
        if self.enclosed {
            self.out.write_char('}')?;
        }
        Ok(())
    }
}

/// A decoded diff payload.
///
/// Used by clients and tests; the server side only ever encodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DiffPayload {
    /// Revision to use as the next baseline.
    #[serde(rename = "ArduJAXrevision")]
    pub revision: Revision,
    /// Changed properties by widget id.
    #[serde(flatten)]
    pub records: BTreeMap<String, BTreeMap<String, String>>,
}

impl DiffPayload {
    /// Decodes a payload from its JSON text.
    pub fn decode(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns true if no widget record is present.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record for a widget.
    pub fn record(&self, id: &str) -> Option<&BTreeMap<String, String>> {
        self.records.get(id)
    }

    /// Returns one property of one widget.
    pub fn property(&self, id: &str, name: &str) -> Option<&str> {
        self.records
            .get(id)
            .and_then(|record| record.get(name))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload() {
        let mut out = String::new();
        let encoder = PayloadEncoder::begin(&mut out, Revision::new(5)).unwrap();
        assert_eq!(encoder.record_count(), 0);
        encoder.finish().unwrap();
        assert_eq!(out, r#"{"ArduJAXrevision":5}"#);
    }

    #[test]
    fn records_are_comma_joined() {
        let mut out = String::new();
        let mut encoder = PayloadEncoder::begin(&mut out, Revision::new(2)).unwrap();
        encoder.begin_record("name", false).unwrap();
        encoder.property("value", "Alice", false).unwrap();
        encoder.end_record().unwrap();
        encoder.begin_record("level", false).unwrap();
        encoder.property("value", 42, false).unwrap();
        encoder.property("style.display", "none", false).unwrap();
        encoder.end_record().unwrap();
        encoder.finish().unwrap();

        assert_eq!(
            out,
            r#"{"ArduJAXrevision":2,"name":{"value":"Alice"},"level":{"value":"42","style.display":"none"}}"#
        );
    }

    #[test]
    fn bare_record_list_has_no_leading_comma() {
        let mut out = String::new();
        let mut encoder = PayloadEncoder::records_only(&mut out);
        encoder.begin_record("a", true).unwrap();
        encoder.property("value", "1", false).unwrap();
        encoder.end_record().unwrap();
        encoder.begin_record("b", false).unwrap();
        encoder.end_record().unwrap();
        encoder.finish().unwrap();
        assert_eq!(out, r#""a":{"value":"1"},"b":{}"#);
    }

    #[test]
    fn untrusted_values_are_escaped() {
        let mut out = String::new();
        let mut encoder = PayloadEncoder::begin(&mut out, Revision::new(3)).unwrap();
        encoder.begin_record("msg", false).unwrap();
        encoder.property("innerHTML", "<i>\"hi\"</i>", true).unwrap();
        encoder.end_record().unwrap();
        encoder.finish().unwrap();

        let decoded = DiffPayload::decode(&out).unwrap();
        assert_eq!(decoded.revision, Revision::new(3));
        assert_eq!(
            decoded.property("msg", "innerHTML"),
            Some("&lt;i>\"hi\"&lt;/i>")
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(DiffPayload::decode("{\"nope\":1}").is_err());
        assert!(DiffPayload::decode("not json").is_err());
    }
}
