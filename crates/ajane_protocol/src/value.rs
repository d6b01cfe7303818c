//! Parsers and formatters for inbound and outbound field values.

use crate::error::{ProtocolError, ProtocolResult};
use std::fmt;
use std::str::FromStr;

/// An RGB colour, written as `#rrggbb` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        let invalid = || ProtocolError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Interprets a submitted check-box value.
///
/// `t`, `true`, `1` and `on` (any case) mean checked; anything else means
/// unchecked.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    ["t", "true", "1", "on"]
        .iter()
        .any(|accepted| value.eq_ignore_ascii_case(accepted))
}

/// Parses a submitted integer, saturating to the `i16` range.
pub fn parse_number(value: &str) -> ProtocolResult<i16> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(value.to_string()))?;
    Ok(parsed.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_round_trip() {
        let colour: Rgb = "#ff8000".parse().unwrap();
        assert_eq!(colour, Rgb::new(255, 128, 0));
        assert_eq!(colour.to_string(), "#ff8000");
        assert_eq!("0a0B0c".parse::<Rgb>().unwrap(), Rgb::new(10, 11, 12));
    }

    #[test]
    fn colour_rejects_bad_input() {
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#ff€00".parse::<Rgb>().is_err());
    }

    #[test]
    fn flags() {
        assert!(parse_flag("t"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" on "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn numbers_saturate() {
        assert_eq!(parse_number("12").unwrap(), 12);
        assert_eq!(parse_number(" -3 ").unwrap(), -3);
        assert_eq!(parse_number("99999").unwrap(), i16::MAX);
        assert!(parse_number("1.5").is_err());
        assert!(parse_number("abc").is_err());
    }
}
