//! Writing logical registers through the overlay.
//!
//! A write resolves into one tagged plan and either mutates exactly one
//! physical store or fails before touching anything. Aliased registers
//! are never updated separately; they share the store, so the single raw
//! write is the whole propagation and a read issued immediately after
//! observes it.
//!
//! Two deliberately different behaviors for unbacked bytes:
//! registers with partial backing (the bytes of Z beyond V outside
//! streaming mode) accept the write and silently discard the unbacked
//! range, reporting success; registers with no backing at all in the
//! current mode (P, FFR outside streaming mode) reject the write with
//! `WriteNotSupported`. Do not collapse the two.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use regctx_core::{
    BackingKind, PhysicalRegId, RegisterCatalog, RegisterError, RegisterKind, RegisterValue,
    Result, StreamingStatus,
    descriptor::{RegisterDescriptor, SIMD_WIDTH},
};

use crate::snapshot::StopSnapshot;
use crate::target::TargetRegisterAccess;

/// How one write will be applied, resolved once per access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WritePlan {
    /// Replace the register's own store at full width.
    Store(PhysicalRegId),
    /// Read-modify-write the group store, replacing its low bytes
    /// (V inside streaming mode).
    MergeLow(PhysicalRegId),
    /// Persist only the low `keep` bytes, discarding the rest as
    /// specified (Z outside streaming mode).
    Truncate { store: PhysicalRegId, keep: usize },
    /// Ask for a streaming transition, then store (ZA/ZT0 outside
    /// streaming mode).
    PromoteThenStore(RegisterKind),
    /// No storage to write in this mode.
    Reject,
}

/// What a successful write did beyond storing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Mode transition triggered as a side effect, to be applied to the
    /// stop snapshot before the next read.
    pub transition: Option<StreamingStatus>,
    /// Bytes legally discarded beyond the backed range. Zero for fully
    /// backed writes; never reported as an error.
    pub discarded: usize,
}

/// Stateless writer over catalog, snapshot and target.
pub struct OverlayWriter;

impl OverlayWriter {
    /// Write `value` to `desc` under `snapshot`.
    ///
    /// The value must match the register's current width exactly. Raw
    /// access failures abort the operation before any store is mutated.
    pub fn write<T: TargetRegisterAccess>(
        catalog: &RegisterCatalog,
        desc: &RegisterDescriptor,
        snapshot: &StopSnapshot,
        target: &T,
        value: &RegisterValue,
    ) -> Result<WriteOutcome> {
        catalog.require_available(desc)?;

        let width = snapshot.width_of(desc);
        if value.len() != width {
            return Err(RegisterError::WrongWidth {
                name: desc.name.clone(),
                expected: width,
                got: value.len(),
            });
        }

        let plan = Self::plan(desc, snapshot);
        trace!(
            "write {}: {:?}, {} bytes in {} mode",
            desc.name,
            plan,
            width,
            snapshot.mode()
        );

        match plan {
            WritePlan::Store(store) => {
                target.raw_write(store, value.as_slice())?;
                Ok(WriteOutcome::default())
            }
            WritePlan::MergeLow(store) => {
                // Fetch first so a faulting store aborts with nothing
                // mutated.
                let mut group = target.raw_read(store)?;
                if group.len() < value.len() {
                    return Err(RegisterError::Hardware(format!(
                        "target returned {} bytes for {} ({} expected at least)",
                        group.len(),
                        store,
                        value.len()
                    )));
                }
                group[..value.len()].copy_from_slice(value.as_slice());
                target.raw_write(store, &group)?;
                Ok(WriteOutcome::default())
            }
            WritePlan::Truncate { store, keep } => {
                target.raw_write(store, &value.as_slice()[..keep])?;
                Ok(WriteOutcome {
                    transition: None,
                    discarded: width - keep,
                })
            }
            WritePlan::PromoteThenStore(kind) => {
                target.request_streaming_transition()?;
                let status = target.streaming_status()?;
                debug!(
                    "write to {} promoted the thread to {} mode",
                    desc.name, status.mode
                );
                // The snapshot the caller applies this to still holds the
                // stop's vector length; only the mode changed.
                let store = match kind {
                    RegisterKind::Za => PhysicalRegId::Za,
                    RegisterKind::Zt0 => PhysicalRegId::Zt0,
                    _ => unreachable!("only matrix registers promote"),
                };
                target.raw_write(store, value.as_slice())?;
                Ok(WriteOutcome {
                    transition: Some(status),
                    discarded: 0,
                })
            }
            WritePlan::Reject => Err(RegisterError::WriteNotSupported {
                name: desc.name.clone(),
                mode: snapshot.mode(),
            }),
        }
    }

    fn plan(desc: &RegisterDescriptor, snapshot: &StopSnapshot) -> WritePlan {
        let mode = snapshot.mode();
        match desc.backing_in(mode) {
            BackingKind::Real => WritePlan::Store(
                desc.physical_store(mode)
                    .expect("real backing always has a store"),
            ),
            BackingKind::Overlay => {
                let store = desc
                    .physical_store(mode)
                    .expect("overlay backing always has a store");
                match desc.kind {
                    RegisterKind::Simd(_) => WritePlan::MergeLow(store),
                    RegisterKind::Scalable(_) => {
                        if snapshot.vector_length() == SIMD_WIDTH {
                            WritePlan::Store(store)
                        } else {
                            WritePlan::Truncate {
                                store,
                                keep: SIMD_WIDTH,
                            }
                        }
                    }
                    _ => unreachable!("only V and Z have overlay backing"),
                }
            }
            BackingKind::Synthesized => match desc.kind {
                // Matrix storage is promotable: the write is legal and
                // switches the thread into streaming mode.
                RegisterKind::Za | RegisterKind::Zt0 => WritePlan::PromoteThenStore(desc.kind),
                _ => WritePlan::Reject,
            },
            BackingKind::StatusDerived => WritePlan::Reject,
        }
    }
}
