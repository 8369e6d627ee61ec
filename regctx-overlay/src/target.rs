//! The raw hardware-access seam.
//!
//! Everything below the overlay is reached through
//! [`TargetRegisterAccess`]: the per-thread register file of a stopped
//! target, addressed by [`PhysicalRegId`]. Which ids are live depends on
//! the execution mode; the overlay never asks for a store that does not
//! exist in the mode it resolved.

use thiserror::Error;

use regctx_core::{PhysicalRegId, RegisterError, StreamingStatus, TargetCapabilities};

/// Identifier of a stopped thread whose registers are being accessed.
pub type ThreadId = u64;

/// Failures at the raw hardware-access layer.
///
/// These surface to callers as [`RegisterError::Hardware`]; none of them
/// is ever downgraded to the legal discard behavior.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("target is not stopped")]
    NotStopped,
    #[error("no physical register {0} in the current mode")]
    NoSuchPhysicalRegister(PhysicalRegId),
    #[error("access fault on {0}")]
    AccessFault(PhysicalRegId),
    #[error("streaming-mode transition refused")]
    TransitionRefused,
    #[error("{0}")]
    Protocol(String),
}

impl From<TargetError> for RegisterError {
    fn from(err: TargetError) -> Self {
        RegisterError::Hardware(err.to_string())
    }
}

/// Register file of one stopped thread, as exposed by the debug
/// transport.
///
/// All operations are synchronous round trips. The surrounding debugger
/// guarantees the thread stays stopped for the lifetime of any borrow of
/// this handle, so implementations take `&self` and may share state
/// internally.
pub trait TargetRegisterAccess {
    /// Vector and matrix extensions present on the target.
    fn capabilities(&self) -> TargetCapabilities;

    /// Streaming vector length in 8-byte granules.
    fn vector_length_granules(&self) -> Result<u64, TargetError>;

    /// Current execution mode and ZA state.
    fn streaming_status(&self) -> Result<StreamingStatus, TargetError>;

    /// Fetch the full current content of a physical store.
    fn raw_read(&self, reg: PhysicalRegId) -> Result<Vec<u8>, TargetError>;

    /// Replace the full content of a physical store.
    fn raw_write(&self, reg: PhysicalRegId, bytes: &[u8]) -> Result<(), TargetError>;

    /// Ask the target to enter streaming mode, as the side effect of a
    /// legal ZA/ZT0 write outside it. No-op when already streaming.
    fn request_streaming_transition(&self) -> Result<(), TargetError>;
}
