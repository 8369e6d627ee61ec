//! The architecture-specific register catalog.
//!
//! The catalog is a static table of logical register descriptors for one
//! target, built once from the target's capabilities. It holds no mutable
//! state; widths are formulas evaluated at read time against the current
//! vector length.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::{
    PREDICATE_REGISTER_COUNT, RegisterDescriptor, RegisterKind, RequiredExtension,
    VECTOR_REGISTER_COUNT,
};
use crate::error::{RegisterError, Result};
use crate::mode::ExecutionMode;

/// `AT_HWCAP` bit for plain SVE.
pub const HWCAP_SVE: u64 = 1 << 22;
/// `AT_HWCAP2` bit for SME.
pub const HWCAP2_SME: u64 = 1 << 23;
/// `AT_HWCAP2` bit for SME2 (adds ZT0).
pub const HWCAP2_SME2: u64 = 1 << 37;

/// Vector and matrix extensions present on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetCapabilities {
    /// SVE outside streaming mode.
    pub sve: bool,
    /// SME: streaming mode, ZA, SVCR/SVG.
    pub sme: bool,
    /// SME2: adds the ZT0 lookup table.
    pub sme2: bool,
}

impl TargetCapabilities {
    /// A target with no vector extensions beyond base SIMD.
    pub fn simd_only() -> Self {
        Self::default()
    }

    /// An SME-only target, the configuration the streaming overlay is
    /// really about: scalable state exists only inside streaming mode.
    pub fn sme_only() -> Self {
        Self {
            sve: false,
            sme: true,
            sme2: false,
        }
    }

    /// SME2 and everything below it.
    pub fn sme2() -> Self {
        Self {
            sve: false,
            sme: true,
            sme2: true,
        }
    }

    /// Decode capabilities from Linux-style hwcap bit sets.
    pub fn from_hwcaps(hwcap: u64, hwcap2: u64) -> Self {
        let sme = hwcap2 & HWCAP2_SME != 0;
        Self {
            sve: hwcap & HWCAP_SVE != 0,
            sme,
            sme2: sme && hwcap2 & HWCAP2_SME2 != 0,
        }
    }

    /// Whether registers gated on `requires` exist on this target.
    pub fn supports(&self, requires: RequiredExtension) -> bool {
        match requires {
            RequiredExtension::Base => true,
            RequiredExtension::ScalableVectors => self.sve || self.sme,
            RequiredExtension::Sme => self.sme,
            RequiredExtension::Sme2 => self.sme2,
        }
    }
}

/// Static table of logical register descriptors for one target.
#[derive(Debug, Clone)]
pub struct RegisterCatalog {
    capabilities: TargetCapabilities,
    entries: Vec<RegisterDescriptor>,
    by_name: HashMap<String, usize>,
}

impl RegisterCatalog {
    /// Build the catalog for a target with the given capabilities.
    ///
    /// Every architecturally defined name is entered so lookups can tell
    /// "unknown register" apart from "known but absent here". Insertion
    /// order is the listing order: FPSR and FPCR, V by index, Z by index,
    /// P by index, FFR, SVCR, SVG, then matrix storage.
    pub fn new(capabilities: TargetCapabilities) -> Self {
        let mut entries = Vec::new();

        entries.push(RegisterDescriptor::new(RegisterKind::Fpsr));
        entries.push(RegisterDescriptor::new(RegisterKind::Fpcr));
        for n in 0..VECTOR_REGISTER_COUNT {
            entries.push(RegisterDescriptor::new(RegisterKind::Simd(n)));
        }
        for n in 0..VECTOR_REGISTER_COUNT {
            entries.push(RegisterDescriptor::new(RegisterKind::Scalable(n)));
        }
        for n in 0..PREDICATE_REGISTER_COUNT {
            entries.push(RegisterDescriptor::new(RegisterKind::Predicate(n)));
        }
        entries.push(RegisterDescriptor::new(RegisterKind::FirstFault));
        entries.push(RegisterDescriptor::new(RegisterKind::Svcr));
        entries.push(RegisterDescriptor::new(RegisterKind::Svg));
        entries.push(RegisterDescriptor::new(RegisterKind::Za));
        entries.push(RegisterDescriptor::new(RegisterKind::Zt0));

        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, desc)| (desc.name.clone(), i))
            .collect();

        Self {
            capabilities,
            entries,
            by_name,
        }
    }

    pub fn capabilities(&self) -> TargetCapabilities {
        self.capabilities
    }

    /// Look up a descriptor by name.
    ///
    /// Unknown names fail with `NoSuchRegister` whether or not any
    /// extension is present. Known names whose extension is absent are
    /// still described; availability is checked separately so callers can
    /// report `Unavailable` with the missing extension.
    pub fn describe(&self, name: &str) -> Result<&RegisterDescriptor> {
        let key = name.to_ascii_lowercase();
        self.by_name
            .get(&key)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| RegisterError::NoSuchRegister(name.to_string()))
    }

    /// Whether the register exists on this target at all.
    pub fn is_available(&self, desc: &RegisterDescriptor) -> bool {
        self.capabilities.supports(desc.requires)
    }

    /// Fail with `Unavailable` if the owning extension is absent.
    pub fn require_available(&self, desc: &RegisterDescriptor) -> Result<()> {
        if self.is_available(desc) {
            Ok(())
        } else {
            Err(RegisterError::Unavailable {
                name: desc.name.clone(),
                extension: desc.requires.to_string(),
            })
        }
    }

    /// Descriptors available on this target, in stable listing order.
    ///
    /// The set does not depend on the mode: registers without backing in
    /// the current mode are still listed, they read as synthesized
    /// values. The mode is taken so callers can pair each entry with its
    /// per-mode backing without a second lookup.
    pub fn list_for_mode(
        &self,
        mode: ExecutionMode,
    ) -> impl Iterator<Item = (&RegisterDescriptor, crate::descriptor::BackingKind)> {
        self.entries
            .iter()
            .filter(|desc| self.is_available(desc))
            .map(move |desc| (desc, desc.backing_in(mode)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BackingKind;

    #[test]
    fn test_listing_order_is_stable() {
        let catalog = RegisterCatalog::new(TargetCapabilities::sme2());
        let names: Vec<_> = catalog
            .list_for_mode(ExecutionMode::NonStreaming)
            .map(|(desc, _)| desc.name.clone())
            .collect();

        assert_eq!(names[0], "fpsr");
        assert_eq!(names[1], "fpcr");
        assert_eq!(names[2], "v0");
        assert_eq!(names[33], "v31");
        assert_eq!(names[34], "z0");
        assert_eq!(names[65], "z31");
        assert_eq!(names[66], "p0");
        assert_eq!(names[81], "p15");
        assert_eq!(names[82], "ffr");
        assert_eq!(names[83], "svcr");
        assert_eq!(names[84], "svg");
        assert_eq!(names[85], "za");
        assert_eq!(names[86], "zt0");
        assert_eq!(names.len(), 87);
    }

    #[test]
    fn test_simd_only_listing() {
        let catalog = RegisterCatalog::new(TargetCapabilities::simd_only());
        let names: Vec<_> = catalog
            .list_for_mode(ExecutionMode::NonStreaming)
            .map(|(desc, _)| desc.name.clone())
            .collect();
        // fpsr, fpcr and the 32 V registers only.
        assert_eq!(names.len(), 34);
        assert!(!names.contains(&"z0".to_string()));
        assert!(!names.contains(&"svcr".to_string()));
    }

    #[test]
    fn test_describe_unknown_name() {
        let catalog = RegisterCatalog::new(TargetCapabilities::sme_only());
        assert_eq!(
            catalog.describe("w0").unwrap_err(),
            RegisterError::NoSuchRegister("w0".to_string())
        );
    }

    #[test]
    fn test_describe_is_case_insensitive() {
        let catalog = RegisterCatalog::new(TargetCapabilities::sme_only());
        assert_eq!(catalog.describe("Z0").unwrap().name, "z0");
    }

    #[test]
    fn test_unavailable_register() {
        let catalog = RegisterCatalog::new(TargetCapabilities::sme_only());
        let zt0 = catalog.describe("zt0").unwrap();
        assert!(matches!(
            catalog.require_available(zt0).unwrap_err(),
            RegisterError::Unavailable { .. }
        ));

        let za = catalog.describe("za").unwrap();
        assert!(catalog.require_available(za).is_ok());
    }

    #[test]
    fn test_from_hwcaps() {
        let caps = TargetCapabilities::from_hwcaps(0, HWCAP2_SME);
        assert!(caps.sme && !caps.sve && !caps.sme2);

        let caps = TargetCapabilities::from_hwcaps(HWCAP_SVE, HWCAP2_SME | HWCAP2_SME2);
        assert!(caps.sme && caps.sve && caps.sme2);

        // SME2 without SME is not a valid combination; the SME bit wins.
        let caps = TargetCapabilities::from_hwcaps(0, HWCAP2_SME2);
        assert!(!caps.sme2);
    }

    #[test]
    fn test_listing_reports_backing_per_mode() {
        let catalog = RegisterCatalog::new(TargetCapabilities::sme_only());
        let backing_of = |mode, name: &str| {
            catalog
                .list_for_mode(mode)
                .find(|(desc, _)| desc.name == name)
                .map(|(_, backing)| backing)
                .unwrap()
        };

        assert_eq!(
            backing_of(ExecutionMode::NonStreaming, "p0"),
            BackingKind::Synthesized
        );
        assert_eq!(backing_of(ExecutionMode::Streaming, "p0"), BackingKind::Real);
    }
}
