#![allow(dead_code)]

use std::cell::RefCell;
use stockham_kernels::{
    kernel::KernelName, source::Source, ArgBlockPtr, ComputeScheme, DeviceAddr, FftKernelError, GridParam,
    KernelLaunch, KernelLauncher, PlanNode, Precision, Result,
};

pub const TWIDDLES: DeviceAddr = DeviceAddr(0x1000);
pub const TWIDDLES_LARGE: DeviceAddr = DeviceAddr(0x2000);
pub const KERN_ARG: DeviceAddr = DeviceAddr(0x3000);
pub const BUF_IN: DeviceAddr = DeviceAddr(0x10_0000);
pub const BUF_OUT: DeviceAddr = DeviceAddr(0x20_0000);
/// Must never show up in an in-place launch.
pub const POISON: DeviceAddr = DeviceAddr(0xdead_0000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub source: Source,
    pub kernel: String,
    pub launch: KernelLaunch,
}

/// Stands in for the GPU: records every launch, or fails with a runtime code.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub launches: RefCell<Vec<Recorded>>,
    pub fail_with: Option<i32>,
}

impl RecordingLauncher {
    pub fn failing(code: i32) -> Self {
        Self {
            launches: RefCell::new(Vec::new()),
            fail_with: Some(code),
        }
    }

    pub fn last(&self) -> Recorded {
        self.launches.borrow().last().cloned().expect("no launch recorded")
    }

    pub fn count(&self) -> usize {
        self.launches.borrow().len()
    }
}

impl KernelLauncher for RecordingLauncher {
    fn launch(&self, source: Source, kernel: &KernelName, launch: &KernelLaunch) -> Result<()> {
        if let Some(code) = self.fail_with {
            return Err(FftKernelError::LaunchError {
                code,
                message: "out of resources".to_string(),
            });
        }
        self.launches.borrow_mut().push(Recorded {
            source,
            kernel: kernel.as_ref().to_string(),
            launch: launch.clone(),
        });
        Ok(())
    }
}

pub fn node(precision: Precision, scheme: ComputeScheme, length: Vec<usize>) -> PlanNode {
    let mut node = PlanNode::new(precision, scheme, length);
    node.batch = 3;
    node.twiddles = TWIDDLES;
    node.twiddles_large = TWIDDLES_LARGE;
    node.dev_kern_arg = ArgBlockPtr::new(KERN_ARG);
    node.grid_param = GridParam::linear(12, 64);
    node
}
