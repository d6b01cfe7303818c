//! String filters for embedding values in payloads and markup.
//!
//! Filters are streaming adapters over [`fmt::Write`], so values can be
//! escaped while they are written, without intermediate buffers.

use bitflags::bitflags;
use std::fmt::{self, Write};

bitflags! {
    /// Escaping rules applied by an [`Escaper`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Escape: u8 {
        /// Escape `"`, `\` and control characters for a JSON string.
        const JSON = 1 << 0;
        /// Escape `<` and `&` so markup renders as plain text.
        const HTML = 1 << 1;
        /// Escape `"`, `<` and `&` for a double-quoted HTML attribute.
        const ATTRIBUTE = 1 << 2;
    }
}

/// A [`fmt::Write`] adapter that escapes everything written through it.
pub struct Escaper<'a, W: Write + ?Sized> {
    inner: &'a mut W,
    rules: Escape,
}

impl<'a, W: Write + ?Sized> Escaper<'a, W> {
    /// Wraps `inner`, applying `rules` to all writes.
    pub fn new(inner: &'a mut W, rules: Escape) -> Self {
        Self { inner, rules }
    }

    fn replacement(&self, c: char) -> Option<&'static str> {
        let json = self.rules.contains(Escape::JSON);
        let markup = self.rules.intersects(Escape::HTML | Escape::ATTRIBUTE);
        match c {
            '"' if json => Some("\\\""),
            '"' if self.rules.contains(Escape::ATTRIBUTE) => Some("&quot;"),
            '\\' if json => Some("\\\\"),
            '\n' if json => Some("\\n"),
            '\r' if json => Some("\\r"),
            '\t' if json => Some("\\t"),
            '<' if markup => Some("&lt;"),
            '&' if markup => Some("&amp;"),
            _ => None,
        }
    }
}

impl<W: Write + ?Sized> Write for Escaper<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut start = 0;
        for (i, c) in s.char_indices() {
            if let Some(replacement) = self.replacement(c) {
                self.inner.write_str(&s[start..i])?;
                self.inner.write_str(replacement)?;
            } else if self.rules.contains(Escape::JSON) && (c as u32) < 0x20 {
                self.inner.write_str(&s[start..i])?;
                write!(self.inner, "\\u{:04x}", c as u32)?;
            } else {
                continue;
            }
            start = i + c.len_utf8();
        }
        self.inner.write_str(&s[start..])
    }
}

/// Writes `value` filtered for the payload.
///
/// If `quoted`, the value is wrapped in double quotes and JSON-escaped. If
/// `html_escaped`, `<` and `&` are replaced by entities so that the value
/// renders as plain text on the client (safe for untrusted input).
pub fn write_filtered<W, V>(out: &mut W, value: V, quoted: bool, html_escaped: bool) -> fmt::Result
where
    W: Write + ?Sized,
    V: fmt::Display,
{
    let mut rules = Escape::empty();
    rules.set(Escape::JSON, quoted);
    rules.set(Escape::HTML, html_escaped);

    if quoted {
        out.write_char('"')?;
    }
    write!(Escaper::new(out, rules), "{}", value)?;
    if quoted {
        out.write_char('"')?;
    }
    Ok(())
}
