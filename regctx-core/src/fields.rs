//! Named bit fields for status registers.
//!
//! The console layer uses these to annotate raw values, e.g. printing
//! `SM = 1, ZA = 1` next to SVCR. Field sets exist only when the owning
//! extension does.

use serde::Serialize;

use crate::catalog::TargetCapabilities;
use crate::value::RegisterValue;

/// One named bit field inside a register, `msb..=lsb` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterField {
    pub name: &'static str,
    pub msb: u8,
    pub lsb: u8,
}

impl RegisterField {
    pub const fn bit(name: &'static str, bit: u8) -> Self {
        Self {
            name,
            msb: bit,
            lsb: bit,
        }
    }

    /// Extract the field from a value, little-endian.
    pub fn extract(&self, value: &RegisterValue) -> u64 {
        let raw = value.as_u64_le();
        let width = self.msb - self.lsb + 1;
        let mask = if width >= 64 { u64::MAX } else { (1 << width) - 1 };
        (raw >> self.lsb) & mask
    }
}

/// The field set of one register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterFields {
    pub register: &'static str,
    pub fields: Vec<RegisterField>,
}

impl RegisterFields {
    /// Render `value` as `NAME = n` pairs, most significant field first.
    pub fn describe(&self, value: &RegisterValue) -> String {
        self.fields
            .iter()
            .map(|field| format!("{} = {}", field.name, field.extract(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Field metadata for SVCR. Matches the architectural register the
/// debugger-side pseudo register mirrors.
fn svcr_fields() -> RegisterFields {
    RegisterFields {
        register: "svcr",
        fields: vec![RegisterField::bit("ZA", 1), RegisterField::bit("SM", 0)],
    }
}

/// Field metadata for a register name, if the target's capabilities
/// include the extension that defines it.
pub fn fields_for(name: &str, capabilities: &TargetCapabilities) -> Option<RegisterFields> {
    match name {
        "svcr" if capabilities.sme => Some(svcr_fields()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svcr_field_extraction() {
        let fields = fields_for("svcr", &TargetCapabilities::sme_only()).unwrap();
        let value = RegisterValue::from_u64_le(0b11, 8);
        assert_eq!(fields.describe(&value), "ZA = 1, SM = 1");

        let value = RegisterValue::from_u64_le(0b01, 8);
        assert_eq!(fields.describe(&value), "ZA = 0, SM = 1");
    }

    #[test]
    fn test_fields_gated_on_capability() {
        assert!(fields_for("svcr", &TargetCapabilities::simd_only()).is_none());
        assert!(fields_for("fpsr", &TargetCapabilities::sme2()).is_none());
    }

    #[test]
    fn test_multi_bit_extract() {
        let field = RegisterField {
            name: "SPAN",
            msb: 7,
            lsb: 4,
        };
        let value = RegisterValue::from_u64_le(0xa5, 8);
        assert_eq!(field.extract(&value), 0xa);
    }
}
