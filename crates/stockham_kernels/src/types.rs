//! Plan attribute enums shared by selection, naming and the dispatch table.

use crate::error::{FftKernelError, Result};
use std::fmt;

/// Floating point precision of the complex-interleaved buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    Single,
    Double,
}

impl Precision {
    /// Short tag used in kernel names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Single => "sp",
            Self::Double => "dp",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Double => write!(f, "double"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placement {
    InPlace,
    OutOfPlace,
}

impl Placement {
    pub fn tag(self) -> &'static str {
        match self {
            Self::InPlace => "ip",
            Self::OutOfPlace => "op",
        }
    }
}

/// Transform direction. Plan nodes store it as a raw signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Forward = -1,
    Inverse = 1,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Forward => "fwd",
            Self::Inverse => "back",
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = FftKernelError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(Self::Forward),
            1 => Ok(Self::Inverse),
            other => Err(FftKernelError::InvalidDirection(other)),
        }
    }
}

impl From<Direction> for i32 {
    fn from(value: Direction) -> Self {
        value as i32
    }
}

/// Whether the fastest-varying dimension is contiguous in both buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrideClass {
    Unit,
    NonUnit,
}

impl StrideClass {
    /// Only element 0 of each stride array takes part in the decision.
    pub fn classify(in_stride: &[usize], out_stride: &[usize]) -> Result<Self> {
        match (in_stride.first(), out_stride.first()) {
            (Some(1), Some(1)) => Ok(Self::Unit),
            (Some(_), Some(_)) => Ok(Self::NonUnit),
            _ => Err(FftKernelError::InvalidStrides("empty stride array".to_string())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::NonUnit => "nonunit",
        }
    }
}

/// Kernel family, one per algorithmic pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// Single-pass Stockham kernels for small lengths
    Stockham,
    /// Large lengths, block column communication with a second twiddle table
    BlockColumn,
    /// Large lengths, block row communication
    BlockRow,
    /// Tiled out-of-place transpose
    Transpose,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stockham => "stockham",
            Self::BlockColumn => "sbcc",
            Self::BlockRow => "sbrc",
            Self::Transpose => "transpose",
        };
        write!(f, "{}", name)
    }
}

/// Transform length a kernel family is specialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeClass {
    Len(usize),
    /// The kernel handles any length
    Any,
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Len(len) => write!(f, "len{}", len),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Computation scheme assigned to a plan node by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComputeScheme {
    #[default]
    Stockham,
    StockhamBlockCc,
    StockhamBlockRc,
    Transpose,
    TransposeXyZ,
    TransposeZXy,
}

impl ComputeScheme {
    pub fn family(self) -> Family {
        match self {
            Self::Stockham => Family::Stockham,
            Self::StockhamBlockCc => Family::BlockColumn,
            Self::StockhamBlockRc => Family::BlockRow,
            Self::Transpose | Self::TransposeXyZ | Self::TransposeZXy => Family::Transpose,
        }
    }
}
