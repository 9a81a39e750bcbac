//! cudarc binding: launcher and device-resident argument blocks.

use crate::{
    args::{ArgBlockPtr, DeviceAddr, KernArgs},
    config::DispatchConfig,
    error::{FftKernelError, Result},
    kernel::{KernelName, Kernels},
    launch::{KernelArg, KernelLaunch, KernelLauncher},
    source::Source,
};
use tracing::{debug, warn};

// Re-export cudarc types
pub use cudarc::driver::{
    CudaContext, CudaFunction, CudaModule, CudaSlice, CudaStream, DevicePtr, DeviceRepr, DriverError, LaunchConfig,
    PushKernelArg,
};
pub use cudarc::nvrtc::Ptx;
pub use std::sync::Arc;

fn driver_error(context: &str, e: DriverError) -> FftKernelError {
    FftKernelError::LaunchError {
        code: e.0 as i32,
        message: format!("{}: {:?}", context, e),
    }
}

// Kernel parameters as the device ABI sees them: pointers and `size_t` are
// 64-bit, the transpose scheme is a 32-bit int. The launch builder borrows
// these, so they are materialized before the launch is built.
enum ArgValue {
    U64(u64),
    I32(i32),
}

impl From<&KernelArg> for ArgValue {
    fn from(arg: &KernelArg) -> Self {
        match *arg {
            KernelArg::Ptr(DeviceAddr(addr)) => Self::U64(addr),
            KernelArg::Size(v) => Self::U64(v as u64),
            KernelArg::I32(v) => Self::I32(v),
        }
    }
}

fn launch_config(launch: &KernelLaunch) -> LaunchConfig {
    LaunchConfig {
        grid_dim: launch.grid,
        block_dim: launch.block,
        shared_mem_bytes: launch.shared_mem_bytes,
    }
}

/// Launches resolved kernels on one stream of one context.
pub struct CudaLauncher {
    context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
    kernels: Arc<Kernels>,
    sync_after_launch: bool,
}

impl std::fmt::Debug for CudaLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CudaLauncher(ordinal={})", self.context.ordinal())
    }
}

impl CudaLauncher {
    /// Launcher on the context's default stream.
    pub fn new(context: Arc<CudaContext>, kernels: Arc<Kernels>) -> Self {
        let stream = context.default_stream();
        Self {
            context,
            stream,
            kernels,
            sync_after_launch: false,
        }
    }

    /// Launches submitted to the same stream execute in submission order.
    pub fn with_stream(mut self, stream: Arc<CudaStream>) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_config(mut self, config: &DispatchConfig) -> Self {
        self.sync_after_launch = config.sync_after_launch;
        self
    }

    pub fn context(&self) -> &Arc<CudaContext> {
        &self.context
    }

    pub fn stream(&self) -> &Arc<CudaStream> {
        &self.stream
    }

    pub fn kernels(&self) -> &Arc<Kernels> {
        &self.kernels
    }

    /// Copy a packed argument block to the device on this launcher's stream.
    pub fn upload_args(&self, args: &KernArgs) -> Result<DeviceArgBlock> {
        DeviceArgBlock::upload(&self.stream, args)
    }

    pub fn synchronize(&self) -> Result<()> {
        self.stream
            .synchronize()
            .map_err(|e| driver_error("failed to synchronize", e))
    }
}

impl KernelLauncher for CudaLauncher {
    /// Resolve the variant's symbol (loading its PTX module on first use),
    /// push the positional arguments and submit on this launcher's stream.
    fn launch(&self, source: Source, kernel: &KernelName, launch: &KernelLaunch) -> Result<()> {
        let func = self.kernels.load_function(&self.context, source, kernel)?;
        let values: Vec<ArgValue> = launch.args.iter().map(ArgValue::from).collect();

        let mut builder = self.stream.launch_builder(&func);
        for value in &values {
            match value {
                ArgValue::U64(v) => builder.arg(v),
                ArgValue::I32(v) => builder.arg(v),
            };
        }
        // SAFETY: argument kinds and order come from the family's selection
        // function, which follows the kernel signature of that family.
        if let Err(e) = unsafe { builder.launch(launch_config(launch)) } {
            warn!(kernel = %kernel, error = ?e, "kernel launch failed");
            return Err(driver_error(&format!("failed to launch {}", kernel), e));
        }

        if self.sync_after_launch {
            self.synchronize()?;
        }
        debug!(kernel = %kernel, "kernel submitted");
        Ok(())
    }
}

/// Argument block resident in device memory, freed on drop.
pub struct DeviceArgBlock {
    data: CudaSlice<u64>,
    dims: usize,
}

impl std::fmt::Debug for DeviceArgBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeviceArgBlock(dims={}, len={})", self.dims, self.data.len())
    }
}

impl DeviceArgBlock {
    pub fn upload(stream: &Arc<CudaStream>, args: &KernArgs) -> Result<Self> {
        let data = stream
            .memcpy_stod(args.as_slice())
            .map_err(|e| FftKernelError::MemoryError(format!("failed to copy argument block: {:?}", e)))?;
        Ok(Self { data, dims: args.dims() })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Base pointer view for a plan node's `dev_kern_arg`.
    ///
    /// The block must outlive every launch that references the pointer.
    pub fn ptr(&self, stream: &Arc<CudaStream>) -> ArgBlockPtr {
        let (addr, _record) = self.data.device_ptr(stream);
        ArgBlockPtr::new(DeviceAddr(addr))
    }
}
