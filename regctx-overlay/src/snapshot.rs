//! Per-stop capture of execution mode and vector length.
//!
//! Mode and vector length are queried once per stop event and held fixed
//! for every read and write issued within that stop, so a sequence of
//! operations never sees an inconsistent mix of widths and backings. The
//! one sanctioned in-stop change is the streaming transition emitted by
//! the writer, which is applied to the snapshot explicitly.

use regctx_core::{
    ExecutionMode, RegisterDescriptor, RegisterError, Result, StreamingStatus, SvcrValue,
    svg_granules,
};

use crate::target::TargetRegisterAccess;

/// Smallest and largest plausible streaming vector lengths in bytes.
const SVL_MIN: usize = 16;
const SVL_MAX: usize = 256;

/// Query the streaming vector length from the target, in bytes.
///
/// Fails with `Hardware` if the query itself fails or reports a length
/// that is not a multiple of 16 in [16, 256].
pub fn current_vector_length<T: TargetRegisterAccess>(target: &T) -> Result<usize> {
    let granules = target.vector_length_granules()?;
    let svl_b = granules as usize * 8;
    if svl_b < SVL_MIN || svl_b > SVL_MAX || svl_b % 16 != 0 {
        return Err(RegisterError::Hardware(format!(
            "implausible streaming vector length: {} bytes",
            svl_b
        )));
    }
    Ok(svl_b)
}

/// Query the current execution mode and ZA state from the target.
pub fn current_streaming_status<T: TargetRegisterAccess>(target: &T) -> Result<StreamingStatus> {
    Ok(target.streaming_status()?)
}

/// The derived status register pair for a given mode and vector length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegisters {
    pub svcr: SvcrValue,
    /// Streaming vector length in 8-byte granules.
    pub svg: u64,
}

/// Compute SVCR and SVG. Never stored; both are functions of the
/// arguments alone.
pub fn status_registers(status: StreamingStatus, svl_b: usize) -> StatusRegisters {
    StatusRegisters {
        svcr: SvcrValue::from_status(status),
        svg: svg_granules(svl_b),
    }
}

/// Mode and vector length captured at one stop event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopSnapshot {
    status: StreamingStatus,
    svl_b: usize,
}

impl StopSnapshot {
    /// Capture a fresh snapshot from a stopped target.
    pub fn capture<T: TargetRegisterAccess>(target: &T) -> Result<Self> {
        let status = current_streaming_status(target)?;
        let svl_b = current_vector_length(target)?;
        Ok(Self { status, svl_b })
    }

    pub fn mode(&self) -> ExecutionMode {
        self.status.mode
    }

    pub fn status(&self) -> StreamingStatus {
        self.status
    }

    pub fn vector_length(&self) -> usize {
        self.svl_b
    }

    /// The status register pair at this snapshot.
    pub fn status_registers(&self) -> StatusRegisters {
        status_registers(self.status, self.svl_b)
    }

    /// Current byte width of a register under this snapshot.
    pub fn width_of(&self, desc: &RegisterDescriptor) -> usize {
        desc.width_at(self.svl_b)
    }

    /// Apply a mode transition emitted by the writer, so the immediately
    /// following read observes the new mode. The vector length captured
    /// at the stop is kept.
    pub fn apply_transition(&mut self, status: StreamingStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regctx_core::ExecutionMode;

    #[test]
    fn test_status_registers_derivation() {
        let regs = status_registers(StreamingStatus::streaming(), 32);
        assert_eq!(regs.svcr.bits(), 0b11);
        assert_eq!(regs.svg, 4);

        let regs = status_registers(StreamingStatus::non_streaming(), 64);
        assert_eq!(regs.svcr.bits(), 0);
        assert_eq!(regs.svg, 8);
    }

    #[test]
    fn test_apply_transition_keeps_vector_length() {
        let mut snap = StopSnapshot {
            status: StreamingStatus::non_streaming(),
            svl_b: 32,
        };
        snap.apply_transition(StreamingStatus::streaming());
        assert_eq!(snap.mode(), ExecutionMode::Streaming);
        assert_eq!(snap.vector_length(), 32);
    }
}
