//! Kernel variant identity and the per-family selection functions.
//!
//! A dispatch function inspects one [`DeviceCallIn`](crate::plan::DeviceCallIn)
//! and returns the [`Variant`] to launch together with its positional
//! arguments. Selection is pure: the same snapshot always yields the same
//! variant and argument list.

pub mod large;
pub(crate) mod macros;
pub mod small;
pub mod transpose;

use crate::{
    error::{FftKernelError, Result},
    plan::PlanNode,
    types::{Direction, Family, Placement, Precision, SizeClass, StrideClass},
};

/// Key of the dispatch table: which function handles a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey {
    pub size: SizeClass,
    pub precision: Precision,
    pub family: Family,
}

impl DispatchKey {
    pub fn new(size: SizeClass, precision: Precision, family: Family) -> Self {
        Self {
            size,
            precision,
            family,
        }
    }

    /// Key a planner would pick for this node.
    ///
    /// Length-specialised families are keyed on `length[0]`.
    pub fn for_node(node: &PlanNode) -> Result<Self> {
        let family = node.scheme.family();
        let size = match family {
            Family::Transpose => SizeClass::Any,
            Family::Stockham | Family::BlockColumn | Family::BlockRow => {
                SizeClass::Len(*node.length.first().ok_or_else(|| {
                    FftKernelError::InvalidDimensions("plan node has no lengths".to_string())
                })?)
            },
        };
        Ok(Self::new(size, node.precision, family))
    }
}

/// Attributes that pick one instantiation inside a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Stockham {
        direction: Direction,
        placement: Placement,
        stride: StrideClass,
    },
    /// Out-of-place, unit stride only
    BlockColumn { direction: Direction },
    /// Out-of-place, unit stride only
    BlockRow { direction: Direction },
    Transpose,
}

impl Variant {
    pub fn family(&self) -> Family {
        match self {
            Self::Stockham { .. } => Family::Stockham,
            Self::BlockColumn { .. } => Family::BlockColumn,
            Self::BlockRow { .. } => Family::BlockRow,
            Self::Transpose => Family::Transpose,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Stockham { direction, .. } | Self::BlockColumn { direction } | Self::BlockRow { direction } => {
                Some(*direction)
            },
            Self::Transpose => None,
        }
    }

    /// Every instantiation a family provides.
    pub fn all(family: Family) -> Vec<Variant> {
        const DIRECTIONS: [Direction; 2] = [Direction::Forward, Direction::Inverse];
        match family {
            Family::Stockham => {
                let mut variants = Vec::with_capacity(8);
                for placement in [Placement::InPlace, Placement::OutOfPlace] {
                    for stride in [StrideClass::Unit, StrideClass::NonUnit] {
                        for direction in DIRECTIONS {
                            variants.push(Self::Stockham {
                                direction,
                                placement,
                                stride,
                            });
                        }
                    }
                }
                variants
            },
            Family::BlockColumn => DIRECTIONS.iter().map(|&direction| Self::BlockColumn { direction }).collect(),
            Family::BlockRow => DIRECTIONS.iter().map(|&direction| Self::BlockRow { direction }).collect(),
            Family::Transpose => vec![Self::Transpose],
        }
    }
}

/// One compiled kernel instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelVariant {
    pub key: DispatchKey,
    pub variant: Variant,
}

impl KernelVariant {
    pub fn new(key: DispatchKey, variant: Variant) -> Self {
        Self { key, variant }
    }

    /// Symbol name of the instantiation inside its PTX module.
    ///
    /// e.g. `fft_fwd_ip_len64_sp_unit`, `fft_back_op_len128_sbcc_dp`, `transpose_tiled_sp`
    pub fn kernel_name(&self) -> String {
        let precision = self.key.precision.tag();
        let size = self.key.size;
        match self.variant {
            Variant::Stockham {
                direction,
                placement,
                stride,
            } => format!(
                "fft_{}_{}_{}_{}_{}",
                direction.tag(),
                placement.tag(),
                size,
                precision,
                stride.tag()
            ),
            Variant::BlockColumn { direction } => format!("fft_{}_op_{}_sbcc_{}", direction.tag(), size, precision),
            Variant::BlockRow { direction } => format!("fft_{}_op_{}_sbrc_{}", direction.tag(), size, precision),
            Variant::Transpose => match size {
                SizeClass::Any => format!("transpose_tiled_{}", precision),
                SizeClass::Len(_) => format!("transpose_tiled_{}_{}", size, precision),
            },
        }
    }
}

pub(crate) fn dims(node: &PlanNode) -> Result<usize> {
    match node.length.len() {
        0 => Err(FftKernelError::InvalidDimensions("plan node has no lengths".to_string())),
        n => Ok(n),
    }
}
