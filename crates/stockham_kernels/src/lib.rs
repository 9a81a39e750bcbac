//! Kernel-variant dispatch for GPU FFT plan nodes.
//!
//! Turns one execution-plan node into exactly one launch of a precompiled
//! kernel instantiation, chosen by precision, direction, placement and stride
//! class, with length/stride metadata passed through a packed argument block.

pub mod args;
pub mod config;
pub mod cuda;
pub mod dispatch;
pub mod error;
pub mod kernel;
pub mod kernels;
pub mod launch;
pub mod plan;
pub mod source;
pub mod types;
pub use cudarc;

pub use args::{ArgBlockPtr, DeviceAddr, KernArgs, KERN_ARGS_ARRAY_WIDTH};
pub use config::DispatchConfig;
pub use dispatch::{DispatchTable, Dispatcher};
pub use error::{FftKernelError, Result};
pub use kernel::{KernelTable, Kernels};
pub use kernels::{DispatchKey, KernelVariant, Variant};
pub use launch::{KernelArg, KernelLaunch, KernelLauncher};
pub use plan::{DeviceCallIn, DeviceCallOut, GridParam, PlanNode};
pub use types::{ComputeScheme, Direction, Family, Placement, Precision, SizeClass, StrideClass};
