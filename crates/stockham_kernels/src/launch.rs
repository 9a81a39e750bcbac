//! Launch requests and the seam to the accelerator runtime.

use crate::{
    args::DeviceAddr,
    error::Result,
    kernel::KernelName,
    kernels::Variant,
    plan::GridParam,
    source::Source,
};

/// One positional kernel argument. Every pointer and count is 64 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelArg {
    Ptr(DeviceAddr),
    Size(usize),
    I32(i32),
}

/// Fully resolved launch: which variant, on what grid, with which arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelLaunch {
    pub variant: Variant,
    pub grid: (u32, u32, u32),
    pub block: (u32, u32, u32),
    pub shared_mem_bytes: u32,
    pub args: Vec<KernelArg>,
}

impl KernelLaunch {
    /// Grid copied verbatim from the planner's 1-D launch parameters.
    pub fn linear(variant: Variant, grid_param: &GridParam, args: Vec<KernelArg>) -> Self {
        Self {
            variant,
            grid: (grid_param.b_x, 1, 1),
            block: (grid_param.tpb_x, 1, 1),
            shared_mem_bytes: grid_param.lds_bytes,
            args,
        }
    }

    pub fn threads_per_block(&self) -> u64 {
        self.block.0 as u64 * self.block.1 as u64 * self.block.2 as u64
    }

    /// Pointer arguments in positional order.
    pub fn pointers(&self) -> impl Iterator<Item = DeviceAddr> + '_ {
        self.args.iter().filter_map(|arg| match arg {
            KernelArg::Ptr(p) => Some(*p),
            _ => None,
        })
    }
}

/// Submits a resolved launch to an execution stream.
///
/// Implementations must not block on kernel completion unless configured to.
pub trait KernelLauncher {
    fn launch(&self, source: Source, kernel: &KernelName, launch: &KernelLaunch) -> Result<()>;
}

impl<L: KernelLauncher + ?Sized> KernelLauncher for &L {
    fn launch(&self, source: Source, kernel: &KernelName, launch: &KernelLaunch) -> Result<()> {
        (**self).launch(source, kernel, launch)
    }
}

impl<L: KernelLauncher + ?Sized> KernelLauncher for std::sync::Arc<L> {
    fn launch(&self, source: Source, kernel: &KernelName, launch: &KernelLaunch) -> Result<()> {
        (**self).launch(source, kernel, launch)
    }
}
