//! Reading logical registers through the overlay.
//!
//! Each read resolves the descriptor, mode and vector length into one
//! tagged plan, then executes it. Reads never mutate anything, and a
//! synthesized read never touches the raw access layer.

use log::trace;

use regctx_core::{
    BackingKind, PhysicalRegId, RegisterCatalog, RegisterError, RegisterKind, RegisterValue,
    Result,
    descriptor::{RegisterDescriptor, SIMD_WIDTH},
};

use crate::snapshot::StopSnapshot;
use crate::target::TargetRegisterAccess;

/// How one read will be satisfied, resolved once per access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadPlan {
    /// Fetch the register's own store at full width.
    Fetch(PhysicalRegId),
    /// Fetch the group store and keep its low `width` bytes (V inside
    /// streaming mode).
    FetchLow(PhysicalRegId),
    /// Fetch a narrower store and zero-fill up to `width` (Z outside
    /// streaming mode).
    FetchZeroExtend(PhysicalRegId),
    /// Fixed all-zero value, no hardware involved.
    Zeros,
    /// Computed from the snapshot.
    Status,
}

/// Stateless reader over catalog, snapshot and target.
pub struct OverlayReader;

impl OverlayReader {
    /// Read the current value of `desc` under `snapshot`.
    pub fn read<T: TargetRegisterAccess>(
        catalog: &RegisterCatalog,
        desc: &RegisterDescriptor,
        snapshot: &StopSnapshot,
        target: &T,
    ) -> Result<RegisterValue> {
        catalog.require_available(desc)?;

        let width = snapshot.width_of(desc);
        let plan = Self::plan(desc, snapshot);
        trace!(
            "read {}: {:?}, width {} in {} mode",
            desc.name,
            plan,
            width,
            snapshot.mode()
        );

        match plan {
            ReadPlan::Fetch(store) => {
                let raw = target.raw_read(store)?;
                Self::expect_width(desc, &raw, width)?;
                Ok(RegisterValue::new(raw))
            }
            ReadPlan::FetchLow(store) => {
                let raw = target.raw_read(store)?;
                if raw.len() < width {
                    return Err(Self::short_read(desc, raw.len(), width));
                }
                Ok(RegisterValue::new(raw[..width].to_vec()))
            }
            ReadPlan::FetchZeroExtend(store) => {
                let mut raw = target.raw_read(store)?;
                if raw.len() != SIMD_WIDTH {
                    return Err(Self::short_read(desc, raw.len(), SIMD_WIDTH));
                }
                raw.resize(width, 0);
                Ok(RegisterValue::new(raw))
            }
            ReadPlan::Zeros => Ok(RegisterValue::zeroed(width)),
            ReadPlan::Status => {
                let status = snapshot.status_registers();
                let scalar = match desc.kind {
                    RegisterKind::Svcr => status.svcr.bits(),
                    RegisterKind::Svg => status.svg,
                    _ => unreachable!("status plan for non-status register"),
                };
                Ok(RegisterValue::from_u64_le(scalar, width))
            }
        }
    }

    fn plan(desc: &RegisterDescriptor, snapshot: &StopSnapshot) -> ReadPlan {
        let mode = snapshot.mode();
        match desc.backing_in(mode) {
            BackingKind::Real => ReadPlan::Fetch(
                desc.physical_store(mode)
                    .expect("real backing always has a store"),
            ),
            BackingKind::Overlay => {
                let store = desc
                    .physical_store(mode)
                    .expect("overlay backing always has a store");
                match desc.kind {
                    // V is the low 16 bytes of the Z store while streaming.
                    RegisterKind::Simd(_) => ReadPlan::FetchLow(store),
                    // Z overlays the 16-byte V store with zero fill.
                    RegisterKind::Scalable(_) => {
                        if snapshot.vector_length() == SIMD_WIDTH {
                            ReadPlan::Fetch(store)
                        } else {
                            ReadPlan::FetchZeroExtend(store)
                        }
                    }
                    _ => unreachable!("only V and Z have overlay backing"),
                }
            }
            BackingKind::Synthesized => ReadPlan::Zeros,
            BackingKind::StatusDerived => ReadPlan::Status,
        }
    }

    fn expect_width(desc: &RegisterDescriptor, raw: &[u8], width: usize) -> Result<()> {
        if raw.len() == width {
            Ok(())
        } else {
            Err(Self::short_read(desc, raw.len(), width))
        }
    }

    fn short_read(desc: &RegisterDescriptor, got: usize, width: usize) -> RegisterError {
        RegisterError::Hardware(format!(
            "target returned {} bytes for {} ({} expected)",
            got, desc.name, width
        ))
    }
}
