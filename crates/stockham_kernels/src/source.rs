use crate::types::Family;
use std::fmt;

/// Name of a PTX module holding one or more kernel families.
///
/// The PTX itself is registered on [`Kernels`](crate::kernel::Kernels) at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Source(pub &'static str);

impl Source {
    pub const STOCKHAM: Source = Source("stockham");
    pub const BLOCK_CC: Source = Source("stockham_sbcc");
    pub const BLOCK_RC: Source = Source("stockham_sbrc");
    pub const TRANSPOSE: Source = Source("transpose");

    /// Default module for a family.
    pub fn for_family(family: Family) -> Self {
        match family {
            Family::Stockham => Self::STOCKHAM,
            Family::BlockColumn => Self::BLOCK_CC,
            Family::BlockRow => Self::BLOCK_RC,
            Family::Transpose => Self::TRANSPOSE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
