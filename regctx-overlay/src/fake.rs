//! An in-memory target for tests and the console tool.
//!
//! Holds one thread's register file with the mode-dependent live set of
//! physical stores: `V`/`FPSR`/`FPCR` outside streaming mode, the
//! scalable and matrix stores inside it. The streaming transition mirrors
//! what SMSTART does on hardware: scalable state and ZA come up zeroed,
//! the floating-point control registers survive.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use regctx_core::{
    PhysicalRegId, StreamingStatus, TargetCapabilities,
    descriptor::{PREDICATE_REGISTER_COUNT, SIMD_WIDTH, VECTOR_REGISTER_COUNT},
};

use crate::target::{TargetError, TargetRegisterAccess};

/// FPSR fixture value, recognizable from the debugger side.
const FIXTURE_FPSR: [u8; 4] = [0x15, 0x00, 0x00, 0x50];
/// FPCR fixture value.
const FIXTURE_FPCR: [u8; 4] = [0x05, 0x15, 0x55, 0x05];
/// Predicate fixture bytes cycle through the patterns left by
/// `ptrue .b/.h/.s/.d` and `pfalse`.
const FIXTURE_PREDICATES: [u8; 5] = [0xff, 0x55, 0x11, 0x01, 0x00];

#[derive(Debug)]
struct FakeState {
    capabilities: TargetCapabilities,
    svl_b: usize,
    status: StreamingStatus,
    stores: Vec<(PhysicalRegId, Vec<u8>)>,
    fail_reads: HashSet<PhysicalRegId>,
    fail_writes: HashSet<PhysicalRegId>,
    stopped: bool,
}

impl FakeState {
    fn store_width(&self, reg: PhysicalRegId) -> usize {
        match reg {
            PhysicalRegId::V(_) => SIMD_WIDTH,
            PhysicalRegId::Z(_) => self.svl_b,
            PhysicalRegId::P(_) | PhysicalRegId::Ffr => self.svl_b / 8,
            PhysicalRegId::Za => self.svl_b * self.svl_b,
            PhysicalRegId::Zt0 => 2 * self.svl_b,
            PhysicalRegId::Fpsr | PhysicalRegId::Fpcr => 4,
        }
    }

    /// Whether `reg` exists as real storage in the current mode.
    fn is_live(&self, reg: PhysicalRegId) -> bool {
        let streaming = self.status.mode.is_streaming();
        match reg {
            PhysicalRegId::Fpsr | PhysicalRegId::Fpcr => true,
            PhysicalRegId::V(n) => !streaming && n < VECTOR_REGISTER_COUNT,
            PhysicalRegId::Z(n) => streaming && n < VECTOR_REGISTER_COUNT,
            PhysicalRegId::P(n) => streaming && n < PREDICATE_REGISTER_COUNT,
            PhysicalRegId::Ffr => streaming,
            PhysicalRegId::Za => streaming && self.status.za_active,
            PhysicalRegId::Zt0 => streaming && self.capabilities.sme2,
        }
    }

    fn store_mut(&mut self, reg: PhysicalRegId) -> &mut Vec<u8> {
        if let Some(i) = self.stores.iter().position(|(id, _)| *id == reg) {
            return &mut self.stores[i].1;
        }
        let width = self.store_width(reg);
        self.stores.push((reg, vec![0; width]));
        &mut self.stores.last_mut().unwrap().1
    }

    fn store(&self, reg: PhysicalRegId) -> Option<&Vec<u8>> {
        self.stores
            .iter()
            .find(|(id, _)| *id == reg)
            .map(|(_, bytes)| bytes)
    }

    /// SMSTART: drop the SIMD-mode stores and bring up zeroed scalable
    /// and matrix state.
    fn enter_streaming(&mut self) {
        self.stores
            .retain(|(id, _)| matches!(id, PhysicalRegId::Fpsr | PhysicalRegId::Fpcr));
        self.status = StreamingStatus::streaming();
        for n in 0..VECTOR_REGISTER_COUNT {
            let _ = self.store_mut(PhysicalRegId::Z(n));
        }
        for n in 0..PREDICATE_REGISTER_COUNT {
            let _ = self.store_mut(PhysicalRegId::P(n));
        }
        let _ = self.store_mut(PhysicalRegId::Ffr);
        let _ = self.store_mut(PhysicalRegId::Za);
        if self.capabilities.sme2 {
            let _ = self.store_mut(PhysicalRegId::Zt0);
        }
    }
}

/// Shared-handle fake target. Clones observe the same register file, so
/// a test can hold one handle inside a context and inspect raw state
/// through another.
#[derive(Debug, Clone)]
pub struct FakeSmeTarget {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSmeTarget {
    /// A stopped SME-only thread outside streaming mode.
    pub fn non_streaming(svl_b: usize) -> Self {
        Self::with_capabilities(TargetCapabilities::sme_only(), svl_b, false)
    }

    /// A stopped SME-only thread inside streaming mode with ZA active.
    pub fn streaming(svl_b: usize) -> Self {
        Self::with_capabilities(TargetCapabilities::sme_only(), svl_b, true)
    }

    /// A stopped thread with explicit capabilities and mode.
    pub fn with_capabilities(
        capabilities: TargetCapabilities,
        svl_b: usize,
        streaming: bool,
    ) -> Self {
        let status = if streaming {
            StreamingStatus::streaming()
        } else {
            StreamingStatus::non_streaming()
        };
        let mut state = FakeState {
            capabilities,
            svl_b,
            status,
            stores: Vec::new(),
            fail_reads: HashSet::new(),
            fail_writes: HashSet::new(),
            stopped: true,
        };
        if streaming {
            state.enter_streaming();
        }
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Load the SIMD-mode fixture: each V register holds its index plus
    /// one in both 64-bit lanes, with recognizable FPSR/FPCR content.
    pub fn load_simd_fixture(&self) {
        let mut state = self.state.lock();
        for n in 0..VECTOR_REGISTER_COUNT {
            let mut bytes = vec![0u8; SIMD_WIDTH];
            bytes[0] = n + 1;
            bytes[8] = n + 1;
            *state.store_mut(PhysicalRegId::V(n)) = bytes;
        }
        *state.store_mut(PhysicalRegId::Fpsr) = FIXTURE_FPSR.to_vec();
        *state.store_mut(PhysicalRegId::Fpcr) = FIXTURE_FPCR.to_vec();
    }

    /// Load the streaming-mode fixture: each Z register filled with its
    /// index plus one, predicates cycling the ptrue/pfalse patterns, FFR
    /// zero, ZA rows and ZT0 holding ascending bytes.
    pub fn load_streaming_fixture(&self) {
        let mut state = self.state.lock();
        let svl_b = state.svl_b;
        for n in 0..VECTOR_REGISTER_COUNT {
            *state.store_mut(PhysicalRegId::Z(n)) = vec![n + 1; svl_b];
        }
        for n in 0..PREDICATE_REGISTER_COUNT {
            let pattern = FIXTURE_PREDICATES[n as usize % FIXTURE_PREDICATES.len()];
            *state.store_mut(PhysicalRegId::P(n)) = vec![pattern; svl_b / 8];
        }
        *state.store_mut(PhysicalRegId::Ffr) = vec![0; svl_b / 8];

        let mut za = Vec::with_capacity(svl_b * svl_b);
        for _row in 0..svl_b {
            za.extend((0..svl_b).map(|j| (j + 1) as u8));
        }
        *state.store_mut(PhysicalRegId::Za) = za;
        if state.capabilities.sme2 {
            *state.store_mut(PhysicalRegId::Zt0) = (0..2 * svl_b).map(|i| (i + 1) as u8).collect();
        }
        *state.store_mut(PhysicalRegId::Fpsr) = FIXTURE_FPSR.to_vec();
        *state.store_mut(PhysicalRegId::Fpcr) = FIXTURE_FPCR.to_vec();
    }

    /// Raw content of a physical store, for test assertions.
    pub fn raw_store(&self, reg: PhysicalRegId) -> Option<Vec<u8>> {
        self.state.lock().store(reg).cloned()
    }

    /// Make the next accesses to `reg` fail with an access fault.
    pub fn fail_reads_of(&self, reg: PhysicalRegId) {
        self.state.lock().fail_reads.insert(reg);
    }

    pub fn fail_writes_of(&self, reg: PhysicalRegId) {
        self.state.lock().fail_writes.insert(reg);
    }

    /// Mark the thread running; every access fails until it stops again.
    pub fn set_running(&self, running: bool) {
        self.state.lock().stopped = !running;
    }
}

impl TargetRegisterAccess for FakeSmeTarget {
    fn capabilities(&self) -> TargetCapabilities {
        self.state.lock().capabilities
    }

    fn vector_length_granules(&self) -> Result<u64, TargetError> {
        let state = self.state.lock();
        if !state.stopped {
            return Err(TargetError::NotStopped);
        }
        Ok((state.svl_b / 8) as u64)
    }

    fn streaming_status(&self) -> Result<StreamingStatus, TargetError> {
        let state = self.state.lock();
        if !state.stopped {
            return Err(TargetError::NotStopped);
        }
        Ok(state.status)
    }

    fn raw_read(&self, reg: PhysicalRegId) -> Result<Vec<u8>, TargetError> {
        let mut state = self.state.lock();
        if !state.stopped {
            return Err(TargetError::NotStopped);
        }
        if state.fail_reads.contains(&reg) {
            return Err(TargetError::AccessFault(reg));
        }
        if !state.is_live(reg) {
            return Err(TargetError::NoSuchPhysicalRegister(reg));
        }
        Ok(state.store_mut(reg).clone())
    }

    fn raw_write(&self, reg: PhysicalRegId, bytes: &[u8]) -> Result<(), TargetError> {
        let mut state = self.state.lock();
        if !state.stopped {
            return Err(TargetError::NotStopped);
        }
        if state.fail_writes.contains(&reg) {
            return Err(TargetError::AccessFault(reg));
        }
        if !state.is_live(reg) {
            return Err(TargetError::NoSuchPhysicalRegister(reg));
        }
        let width = state.store_width(reg);
        if bytes.len() != width {
            return Err(TargetError::Protocol(format!(
                "raw write of {} bytes to {} ({} bytes wide)",
                bytes.len(),
                reg,
                width
            )));
        }
        *state.store_mut(reg) = bytes.to_vec();
        Ok(())
    }

    fn request_streaming_transition(&self) -> Result<(), TargetError> {
        let mut state = self.state.lock();
        if !state.stopped {
            return Err(TargetError::NotStopped);
        }
        if !state.capabilities.sme {
            return Err(TargetError::TransitionRefused);
        }
        if !state.status.mode.is_streaming() {
            state.enter_streaming();
        }
        Ok(())
    }
}
