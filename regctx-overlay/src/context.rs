//! Per-thread register context: the surface the register front end
//! calls.
//!
//! Owns the catalog, the target handle and the stop snapshot, and keeps
//! them consistent: the snapshot is captured lazily at first use after a
//! stop, held fixed across operations, and updated in place when a write
//! promotes the thread into streaming mode.

use log::debug;
use serde::{Deserialize, Serialize};

use regctx_core::{BackingKind, ExecutionMode, RegisterCatalog, RegisterValue, Result};

use crate::reader::OverlayReader;
use crate::snapshot::StopSnapshot;
use crate::target::{TargetRegisterAccess, ThreadId};
use crate::writer::{OverlayWriter, WriteOutcome};

/// One row of a register listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterListing {
    pub name: String,
    /// Byte width at the current vector length.
    pub width: usize,
    /// Backing in the current mode.
    pub backing: BackingKind,
}

/// Register read/write surface for one stopped thread.
pub struct RegisterContext<T: TargetRegisterAccess> {
    thread: ThreadId,
    catalog: RegisterCatalog,
    target: T,
    snapshot: Option<StopSnapshot>,
}

impl<T: TargetRegisterAccess> RegisterContext<T> {
    pub fn new(thread: ThreadId, target: T) -> Self {
        let catalog = RegisterCatalog::new(target.capabilities());
        Self {
            thread,
            catalog,
            target,
            snapshot: None,
        }
    }

    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub fn catalog(&self) -> &RegisterCatalog {
        &self.catalog
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Invalidate the cached mode and vector length. The front end calls
    /// this at every stop event (breakpoint, step, signal); both are
    /// re-queried before the next operation.
    pub fn notify_stopped(&mut self) {
        self.snapshot = None;
    }

    /// The snapshot for the current stop, capturing it on first use.
    pub fn snapshot(&mut self) -> Result<StopSnapshot> {
        if let Some(snap) = self.snapshot {
            return Ok(snap);
        }
        let snap = StopSnapshot::capture(&self.target)?;
        debug!(
            "thread {}: stopped in {} mode, svl {} bytes",
            self.thread,
            snap.mode(),
            snap.vector_length()
        );
        self.snapshot = Some(snap);
        Ok(snap)
    }

    pub fn mode(&mut self) -> Result<ExecutionMode> {
        Ok(self.snapshot()?.mode())
    }

    pub fn vector_length(&mut self) -> Result<usize> {
        Ok(self.snapshot()?.vector_length())
    }

    /// Available registers with their current widths, in stable catalog
    /// order.
    pub fn list_registers(&mut self) -> Result<Vec<RegisterListing>> {
        let snap = self.snapshot()?;
        Ok(self
            .catalog
            .list_for_mode(snap.mode())
            .map(|(desc, backing)| RegisterListing {
                name: desc.name.clone(),
                width: snap.width_of(desc),
                backing,
            })
            .collect())
    }

    /// Read one register by name.
    pub fn read_register(&mut self, name: &str) -> Result<RegisterValue> {
        let snap = self.snapshot()?;
        let desc = self.catalog.describe(name)?;
        OverlayReader::read(&self.catalog, desc, &snap, &self.target)
    }

    /// Write one register by name. The value must match the register's
    /// current width.
    ///
    /// On success the returned outcome reports any legal byte discard
    /// and any streaming transition, which has already been applied to
    /// this context's snapshot.
    pub fn write_register(&mut self, name: &str, value: &RegisterValue) -> Result<WriteOutcome> {
        let snap = self.snapshot()?;
        let desc = self.catalog.describe(name)?;
        let outcome = OverlayWriter::write(&self.catalog, desc, &snap, &self.target, value)?;

        if let Some(status) = outcome.transition {
            // Make the new mode visible to the very next read.
            let mut snap = snap;
            snap.apply_transition(status);
            self.snapshot = Some(snap);
            debug!(
                "thread {}: now in {} mode after write to {}",
                self.thread,
                status.mode,
                name
            );
        }
        Ok(outcome)
    }
}
