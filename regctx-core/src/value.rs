//! Raw register values and the console byte-vector literal format.
//!
//! Values are plain byte sequences, lowest address first. The console
//! renders vector-class registers as `{0x12 0x34 ...}` literals and
//! status or floating-point control registers as little-endian hex
//! scalars such as `0x50000015`; which form applies is the caller's
//! choice, both parse back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a register value literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueParseError {
    #[error("Empty register value literal")]
    Empty,
    #[error("Invalid byte '{0}' in byte-vector literal")]
    InvalidByte(String),
    #[error("Invalid hex scalar '{0}'")]
    InvalidScalar(String),
    #[error("Value is {got} bytes, register holds {width}")]
    TooWide { got: usize, width: usize },
    #[error("Byte-vector literal is missing a closing brace")]
    UnterminatedVector,
}

/// An ordered byte sequence holding the content of one register.
///
/// The length always equals the owning descriptor's width at the vector
/// length current when the value was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterValue {
    bytes: Vec<u8>,
}

impl RegisterValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// An all-zero value of the given width, the fixed content of every
    /// synthesized register.
    pub fn zeroed(width: usize) -> Self {
        Self {
            bytes: vec![0; width],
        }
    }

    /// A value of `width` bytes all set to `byte`.
    pub fn splat(byte: u8, width: usize) -> Self {
        Self {
            bytes: vec![byte; width],
        }
    }

    /// A little-endian scalar value of the given width.
    ///
    /// Truncates to `width` bytes, which must be 8 or fewer.
    pub fn from_u64_le(value: u64, width: usize) -> Self {
        debug_assert!(width <= 8);
        Self {
            bytes: value.to_le_bytes()[..width].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The value interpreted as a little-endian unsigned scalar. Only the
    /// first 8 bytes participate for wider values.
    pub fn as_u64_le(&self) -> u64 {
        let mut buf = [0u8; 8];
        let take = self.bytes.len().min(8);
        buf[..take].copy_from_slice(&self.bytes[..take]);
        u64::from_le_bytes(buf)
    }

    /// The value rendered as a byte-vector literal, `{0x12 0x34 ...}`.
    pub fn to_vector_literal(&self) -> String {
        self.to_string()
    }

    /// The value rendered as a little-endian hex scalar, `0x50000015`.
    ///
    /// Used for status and floating-point control registers; the vector
    /// literal is the right form for everything wider than 8 bytes.
    pub fn to_hex_scalar(&self) -> String {
        let mut out = String::with_capacity(2 + 2 * self.bytes.len());
        out.push_str("0x");
        for byte in self.bytes.iter().rev() {
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }

    /// Parse a literal and zero-extend scalars to `width` bytes.
    ///
    /// Byte-vector literals must match `width` exactly; hex scalars may be
    /// shorter and are padded with high zero bytes.
    pub fn parse_sized(input: &str, width: usize) -> Result<Self, ValueParseError> {
        let mut value: RegisterValue = input.parse()?;
        if value.len() > width {
            return Err(ValueParseError::TooWide {
                got: value.len(),
                width,
            });
        }
        if value.len() < width && !input.trim_start().starts_with('{') {
            value.bytes.resize(width, 0);
        }
        Ok(value)
    }
}

impl From<Vec<u8>> for RegisterValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for RegisterValue {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "0x{:02x}", byte)?;
        }
        write!(f, "}}")
    }
}

impl FromStr for RegisterValue {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValueParseError::Empty);
        }

        if let Some(inner) = s.strip_prefix('{') {
            let inner = inner
                .strip_suffix('}')
                .ok_or(ValueParseError::UnterminatedVector)?;
            let mut bytes = Vec::new();
            for tok in inner.split_whitespace() {
                let digits = tok.strip_prefix("0x").unwrap_or(tok);
                let byte = u8::from_str_radix(digits, 16)
                    .map_err(|_| ValueParseError::InvalidByte(tok.to_string()))?;
                bytes.push(byte);
            }
            if bytes.is_empty() {
                return Err(ValueParseError::Empty);
            }
            return Ok(RegisterValue::new(bytes));
        }

        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValueParseError::InvalidScalar(s.to_string()));
        }
        // Low bytes of the scalar come last in the text but first in memory.
        let mut bytes = Vec::with_capacity(digits.len().div_ceil(2));
        let mut rest = digits;
        while !rest.is_empty() {
            let split = rest.len().saturating_sub(2);
            let (head, tail) = rest.split_at(split);
            bytes.push(
                u8::from_str_radix(tail, 16)
                    .map_err(|_| ValueParseError::InvalidScalar(s.to_string()))?,
            );
            rest = head;
        }
        Ok(RegisterValue::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_literal_round_trip() {
        let value = RegisterValue::new(vec![0x12, 0x34, 0x56, 0x78]);
        let text = value.to_string();
        assert_eq!(text, "{0x12 0x34 0x56 0x78}");
        assert_eq!(text.parse::<RegisterValue>().unwrap(), value);
    }

    #[test]
    fn test_hex_scalar_rendering() {
        let value = RegisterValue::new(vec![0x15, 0x00, 0x00, 0x50]);
        assert_eq!(value.to_hex_scalar(), "0x50000015");
    }

    #[test]
    fn test_scalar_parse_little_endian() {
        let value: RegisterValue = "0xaabbccdd".parse().unwrap();
        assert_eq!(value.as_slice(), &[0xdd, 0xcc, 0xbb, 0xaa]);
        assert_eq!(value.as_u64_le(), 0xaabbccdd);
    }

    #[test]
    fn test_scalar_parse_odd_digits() {
        let value: RegisterValue = "0x102".parse().unwrap();
        assert_eq!(value.as_slice(), &[0x02, 0x01]);
    }

    #[test]
    fn test_parse_sized_pads_scalars() {
        let value = RegisterValue::parse_sized("0x12", 4).unwrap();
        assert_eq!(value.as_slice(), &[0x12, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_parse_sized_rejects_wide_values() {
        let err = RegisterValue::parse_sized("{0x01 0x02 0x03}", 2).unwrap_err();
        assert_eq!(err, ValueParseError::TooWide { got: 3, width: 2 });
    }

    #[test]
    fn test_parse_sized_keeps_short_vectors() {
        // Byte-vector literals are exact; a short one is reported as-is so
        // the writer can reject it with the register's true width.
        let value = RegisterValue::parse_sized("{0x01 0x02}", 4).unwrap();
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<RegisterValue>().unwrap_err(), ValueParseError::Empty);
        assert!(matches!(
            "{0x12 junk}".parse::<RegisterValue>().unwrap_err(),
            ValueParseError::InvalidByte(_)
        ));
        assert!(matches!(
            "{0x12".parse::<RegisterValue>().unwrap_err(),
            ValueParseError::UnterminatedVector
        ));
        assert!(matches!(
            "0xzz".parse::<RegisterValue>().unwrap_err(),
            ValueParseError::InvalidScalar(_)
        ));
    }
}
