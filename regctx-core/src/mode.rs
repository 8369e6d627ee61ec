//! Execution modes and the status registers derived from them.
//!
//! SME targets run in one of two mutually exclusive modes. Outside
//! streaming mode only the fixed 128-bit SIMD state has hardware backing;
//! inside it the scalable vector, predicate and matrix state is real.
//! SVCR and SVG are never stored anywhere, they are recomputed from the
//! current mode and vector length on every read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The execution mode of a thread at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// SIMD-only mode. V registers are real, scalable state is faked.
    NonStreaming,
    /// Streaming mode. Scalable vector and matrix state is real.
    Streaming,
}

impl ExecutionMode {
    /// Whether scalable vector state has hardware backing in this mode.
    pub fn is_streaming(self) -> bool {
        matches!(self, ExecutionMode::Streaming)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::NonStreaming => write!(f, "non-streaming"),
            ExecutionMode::Streaming => write!(f, "streaming"),
        }
    }
}

/// Mode and matrix-storage state reported by the target at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingStatus {
    pub mode: ExecutionMode,
    /// Whether the ZA matrix storage is enabled.
    pub za_active: bool,
}

impl StreamingStatus {
    /// Status for a thread outside streaming mode with ZA off.
    pub fn non_streaming() -> Self {
        Self {
            mode: ExecutionMode::NonStreaming,
            za_active: false,
        }
    }

    /// Status for a thread in streaming mode with ZA enabled.
    pub fn streaming() -> Self {
        Self {
            mode: ExecutionMode::Streaming,
            za_active: true,
        }
    }
}

/// Value of the SVCR pseudo register.
///
/// Bit 0 (SM) reports streaming mode, bit 1 (ZA) reports enabled matrix
/// storage. The register reads as 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvcrValue(u64);

impl SvcrValue {
    const SM: u64 = 1 << 0;
    const ZA: u64 = 1 << 1;

    /// Derive SVCR from the reported streaming status.
    pub fn from_status(status: StreamingStatus) -> Self {
        let mut bits = 0;
        if status.mode.is_streaming() {
            bits |= Self::SM;
        }
        if status.za_active {
            bits |= Self::ZA;
        }
        SvcrValue(bits)
    }

    pub fn sm(self) -> bool {
        self.0 & Self::SM != 0
    }

    pub fn za(self) -> bool {
        self.0 & Self::ZA != 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }
}

/// The SVG value for a given streaming vector length: the length in
/// 8-byte granules.
pub fn svg_granules(svl_b: usize) -> u64 {
    (svl_b / 8) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svcr_derivation() {
        let svcr = SvcrValue::from_status(StreamingStatus::non_streaming());
        assert_eq!(svcr.bits(), 0);
        assert!(!svcr.sm());
        assert!(!svcr.za());

        let svcr = SvcrValue::from_status(StreamingStatus::streaming());
        assert_eq!(svcr.bits(), 0b11);
        assert!(svcr.sm());
        assert!(svcr.za());
    }

    #[test]
    fn test_svcr_za_without_sm() {
        let svcr = SvcrValue::from_status(StreamingStatus {
            mode: ExecutionMode::NonStreaming,
            za_active: true,
        });
        assert_eq!(svcr.bits(), 0b10);
    }

    #[test]
    fn test_svg_granules() {
        assert_eq!(svg_granules(16), 2);
        assert_eq!(svg_granules(32), 4);
        assert_eq!(svg_granules(256), 32);
    }

    #[test]
    fn test_mode_serialization() {
        let mode = ExecutionMode::Streaming;
        let serialized = serde_json::to_string(&mode).unwrap();
        let deserialized: ExecutionMode = serde_json::from_str(&serialized).unwrap();
        assert_eq!(mode, deserialized);
    }
}
