//! # regctx-core - register catalog and data model
//!
//! Leaf data model for presenting one consistent, named register set
//! across the two mutually exclusive execution modes of an AArch64 SME
//! target: SIMD-only mode and streaming mode.
//!
//! The same logical names exist in both modes, but their backing differs.
//! V registers are real outside streaming mode and become views of the
//! low bytes of Z inside it; Z, P and FFR are faked outside streaming
//! mode; ZA and ZT0 only have storage while streaming; SVCR and SVG are
//! derived from mode and vector length. This crate holds the static side
//! of that picture. The overlay machinery lives in `regctx-overlay`.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod fields;
pub mod mode;
pub mod value;

pub use catalog::{RegisterCatalog, TargetCapabilities};
pub use descriptor::{
    BackingKind, PhysicalRegId, RegisterClass, RegisterDescriptor, RegisterKind, WidthFormula,
};
pub use error::{RegisterError, Result};
pub use fields::{RegisterField, RegisterFields, fields_for};
pub use mode::{ExecutionMode, StreamingStatus, SvcrValue, svg_granules};
pub use value::{RegisterValue, ValueParseError};
