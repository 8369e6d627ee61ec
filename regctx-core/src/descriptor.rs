//! Register descriptors: identity, width formulas and backing
//! classification.
//!
//! Every mode-dependent decision in the overlay layer dispatches on the
//! tagged [`RegisterKind`] resolved once per access, instead of string
//! comparisons scattered across call sites.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mode::ExecutionMode;

/// Number of SIMD / scalable vector registers.
pub const VECTOR_REGISTER_COUNT: u8 = 32;
/// Number of predicate registers, not counting FFR.
pub const PREDICATE_REGISTER_COUNT: u8 = 16;
/// Fixed byte width of a V register.
pub const SIMD_WIDTH: usize = 16;
/// Fixed byte width of FPSR, FPCR.
pub const FP_CONTROL_WIDTH: usize = 4;
/// Byte width of the SVCR and SVG pseudo registers.
pub const STATUS_WIDTH: usize = 8;

/// Classes of registers in the scalable/streaming register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterClass {
    /// Fixed 128-bit SIMD registers, v0-v31.
    Simd,
    /// Scalable vector registers, z0-z31.
    Scalable,
    /// Predicate registers p0-p15 and FFR.
    Predicate,
    /// FPSR and FPCR.
    FloatControl,
    /// Derived status registers, SVCR and SVG.
    Status,
    /// SME matrix storage, ZA and ZT0.
    Matrix,
}

/// Extension a register group needs before it exists on a target at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredExtension {
    /// Present on every AArch64 target.
    Base,
    /// Needs scalable vectors from either SVE or SME.
    ScalableVectors,
    /// Needs SME proper.
    Sme,
    /// Needs SME2.
    Sme2,
}

impl fmt::Display for RequiredExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredExtension::Base => write!(f, "the base architecture"),
            RequiredExtension::ScalableVectors => write!(f, "the SVE or SME extension"),
            RequiredExtension::Sme => write!(f, "the SME extension"),
            RequiredExtension::Sme2 => write!(f, "the SME2 extension"),
        }
    }
}

/// How a register's byte width is computed from the streaming vector
/// length `svl_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidthFormula {
    /// Width independent of vector length.
    Fixed(usize),
    /// `svl_b` bytes: the Z registers.
    VectorLength,
    /// `svl_b / 8` bytes: predicate registers and FFR.
    PredicateLength,
    /// `svl_b * svl_b` bytes: the ZA matrix.
    MatrixSquare,
    /// `2 * svl_b` bytes: the ZT0 lookup table.
    TwiceVectorLength,
}

impl WidthFormula {
    /// Evaluate the formula at a concrete vector length.
    pub fn width(&self, svl_b: usize) -> usize {
        match self {
            WidthFormula::Fixed(width) => *width,
            WidthFormula::VectorLength => svl_b,
            WidthFormula::PredicateLength => svl_b / 8,
            WidthFormula::MatrixSquare => svl_b * svl_b,
            WidthFormula::TwiceVectorLength => 2 * svl_b,
        }
    }
}

/// How a register is backed in a particular execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackingKind {
    /// The register has its own hardware storage at full width.
    Real,
    /// The register shares another register's storage, possibly with
    /// zero-filled bytes beyond it.
    Overlay,
    /// No hardware storage; reads produce a fixed all-zero value.
    Synthesized,
    /// Computed from mode and vector length, never stored.
    StatusDerived,
}

/// Identifier for a physical register store on the target.
///
/// This is the namespace of the raw hardware-access layer. Which ids are
/// live depends on the execution mode: outside streaming mode only `V`,
/// `Fpsr` and `Fpcr` exist, inside it `Z`, `P`, `Ffr`, `Za` and `Zt0`
/// replace the `V` stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalRegId {
    V(u8),
    Z(u8),
    P(u8),
    Ffr,
    Za,
    Zt0,
    Fpsr,
    Fpcr,
}

impl fmt::Display for PhysicalRegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalRegId::V(n) => write!(f, "v{}", n),
            PhysicalRegId::Z(n) => write!(f, "z{}", n),
            PhysicalRegId::P(n) => write!(f, "p{}", n),
            PhysicalRegId::Ffr => write!(f, "ffr"),
            PhysicalRegId::Za => write!(f, "za"),
            PhysicalRegId::Zt0 => write!(f, "zt0"),
            PhysicalRegId::Fpsr => write!(f, "fpsr"),
            PhysicalRegId::Fpcr => write!(f, "fpcr"),
        }
    }
}

/// Tagged identity of a logical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterKind {
    Simd(u8),
    Scalable(u8),
    Predicate(u8),
    FirstFault,
    Fpsr,
    Fpcr,
    Svcr,
    Svg,
    Za,
    Zt0,
}

impl RegisterKind {
    pub fn name(&self) -> String {
        match self {
            RegisterKind::Simd(n) => format!("v{}", n),
            RegisterKind::Scalable(n) => format!("z{}", n),
            RegisterKind::Predicate(n) => format!("p{}", n),
            RegisterKind::FirstFault => "ffr".to_string(),
            RegisterKind::Fpsr => "fpsr".to_string(),
            RegisterKind::Fpcr => "fpcr".to_string(),
            RegisterKind::Svcr => "svcr".to_string(),
            RegisterKind::Svg => "svg".to_string(),
            RegisterKind::Za => "za".to_string(),
            RegisterKind::Zt0 => "zt0".to_string(),
        }
    }

    pub fn class(&self) -> RegisterClass {
        match self {
            RegisterKind::Simd(_) => RegisterClass::Simd,
            RegisterKind::Scalable(_) => RegisterClass::Scalable,
            RegisterKind::Predicate(_) | RegisterKind::FirstFault => RegisterClass::Predicate,
            RegisterKind::Fpsr | RegisterKind::Fpcr => RegisterClass::FloatControl,
            RegisterKind::Svcr | RegisterKind::Svg => RegisterClass::Status,
            RegisterKind::Za | RegisterKind::Zt0 => RegisterClass::Matrix,
        }
    }

    pub fn width_formula(&self) -> WidthFormula {
        match self {
            RegisterKind::Simd(_) => WidthFormula::Fixed(SIMD_WIDTH),
            RegisterKind::Scalable(_) => WidthFormula::VectorLength,
            RegisterKind::Predicate(_) | RegisterKind::FirstFault => WidthFormula::PredicateLength,
            RegisterKind::Fpsr | RegisterKind::Fpcr => WidthFormula::Fixed(FP_CONTROL_WIDTH),
            RegisterKind::Svcr | RegisterKind::Svg => WidthFormula::Fixed(STATUS_WIDTH),
            RegisterKind::Za => WidthFormula::MatrixSquare,
            RegisterKind::Zt0 => WidthFormula::TwiceVectorLength,
        }
    }

    pub fn required_extension(&self) -> RequiredExtension {
        match self {
            RegisterKind::Simd(_) | RegisterKind::Fpsr | RegisterKind::Fpcr => {
                RequiredExtension::Base
            }
            RegisterKind::Scalable(_) | RegisterKind::Predicate(_) | RegisterKind::FirstFault => {
                RequiredExtension::ScalableVectors
            }
            RegisterKind::Svcr | RegisterKind::Svg | RegisterKind::Za => RequiredExtension::Sme,
            RegisterKind::Zt0 => RequiredExtension::Sme2,
        }
    }
}

/// Descriptor for one logical register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDescriptor {
    pub name: String,
    pub kind: RegisterKind,
    pub class: RegisterClass,
    pub width: WidthFormula,
    pub requires: RequiredExtension,
}

impl RegisterDescriptor {
    pub fn new(kind: RegisterKind) -> Self {
        Self {
            name: kind.name(),
            kind,
            class: kind.class(),
            width: kind.width_formula(),
            requires: kind.required_extension(),
        }
    }

    /// Byte width of this register at the given vector length.
    pub fn width_at(&self, svl_b: usize) -> usize {
        self.width.width(svl_b)
    }

    /// Backing classification of this register in the given mode.
    pub fn backing_in(&self, mode: ExecutionMode) -> BackingKind {
        let streaming = mode.is_streaming();
        match self.kind {
            // V registers have their own store only outside streaming
            // mode; inside it they are the low bytes of Z.
            RegisterKind::Simd(_) => {
                if streaming {
                    BackingKind::Overlay
                } else {
                    BackingKind::Real
                }
            }
            // Z overlays V with zero fill outside streaming mode.
            RegisterKind::Scalable(_) => {
                if streaming {
                    BackingKind::Real
                } else {
                    BackingKind::Overlay
                }
            }
            RegisterKind::Predicate(_) | RegisterKind::FirstFault => {
                if streaming {
                    BackingKind::Real
                } else {
                    BackingKind::Synthesized
                }
            }
            RegisterKind::Fpsr | RegisterKind::Fpcr => BackingKind::Real,
            RegisterKind::Svcr | RegisterKind::Svg => BackingKind::StatusDerived,
            RegisterKind::Za | RegisterKind::Zt0 => {
                if streaming {
                    BackingKind::Real
                } else {
                    BackingKind::Synthesized
                }
            }
        }
    }

    /// The physical store holding this register's bytes in the given
    /// mode, if any.
    pub fn physical_store(&self, mode: ExecutionMode) -> Option<PhysicalRegId> {
        let streaming = mode.is_streaming();
        match self.kind {
            RegisterKind::Simd(n) | RegisterKind::Scalable(n) => {
                if streaming {
                    Some(PhysicalRegId::Z(n))
                } else {
                    Some(PhysicalRegId::V(n))
                }
            }
            RegisterKind::Predicate(n) => streaming.then_some(PhysicalRegId::P(n)),
            RegisterKind::FirstFault => streaming.then_some(PhysicalRegId::Ffr),
            RegisterKind::Fpsr => Some(PhysicalRegId::Fpsr),
            RegisterKind::Fpcr => Some(PhysicalRegId::Fpcr),
            RegisterKind::Svcr | RegisterKind::Svg => None,
            RegisterKind::Za => streaming.then_some(PhysicalRegId::Za),
            RegisterKind::Zt0 => streaming.then_some(PhysicalRegId::Zt0),
        }
    }
}
