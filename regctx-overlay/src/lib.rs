//! # regctx-overlay - register overlay and synthesis machinery
//!
//! Presents one consistent named register set over a target whose
//! hardware backing changes with the execution mode. The overlay decides,
//! per access, whether a logical register maps to its own store, to a
//! slice of another register's store, to a fixed synthesized value, or to
//! a status computation, and keeps every alias coherent through single
//! whole-store writes.
//!
//! Layering, leaf first:
//!
//! - [`target`]: the raw hardware-access trait and its error type.
//! - [`fake`]: an in-memory target for tests and tools.
//! - [`snapshot`]: per-stop capture of mode and vector length.
//! - [`reader`] / [`writer`]: plan-based read and write paths.
//! - [`context`]: the per-thread facade the front end calls.

pub mod context;
pub mod fake;
pub mod reader;
pub mod snapshot;
pub mod target;
pub mod writer;

pub use context::{RegisterContext, RegisterListing};
pub use fake::FakeSmeTarget;
pub use reader::OverlayReader;
pub use snapshot::{StatusRegisters, StopSnapshot, current_streaming_status, current_vector_length, status_registers};
pub use target::{TargetError, TargetRegisterAccess, ThreadId};
pub use writer::{OverlayWriter, WriteOutcome};
