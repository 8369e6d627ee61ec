//! Error types for register catalog and overlay operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mode::ExecutionMode;

/// Errors that can occur while resolving, reading or writing registers.
///
/// The intentional discard of unbacked Z-register bytes outside streaming
/// mode is successful behavior and has no variant here.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterError {
    #[error("No register named '{0}'")]
    NoSuchRegister(String),
    #[error("Register '{name}' requires {extension}, which this target does not have")]
    Unavailable { name: String, extension: String },
    #[error("Wrong value width for '{name}': expected {expected} bytes, got {got}")]
    WrongWidth {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("Register '{name}' has no storage to write in {mode} mode")]
    WriteNotSupported { name: String, mode: ExecutionMode },
    #[error("Hardware access failed: {0}")]
    Hardware(String),
}

/// Result alias used throughout the register subsystem.
pub type Result<T> = std::result::Result<T, RegisterError>;
