//! Console commands.

pub mod list;
pub mod read;
pub mod write;

use regctx_core::RegisterClass;
use regctx_overlay::{FakeSmeTarget, RegisterContext};

/// The context every command runs against.
pub type Context = RegisterContext<FakeSmeTarget>;

/// Whether a register's value prints as a hex scalar rather than a
/// byte-vector literal.
pub(crate) fn prints_as_scalar(class: RegisterClass) -> bool {
    matches!(class, RegisterClass::FloatControl | RegisterClass::Status)
}
