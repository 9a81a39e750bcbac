//! Plan node snapshot handed to a dispatch function, and the status it returns.

use crate::{
    args::{ArgBlockPtr, DeviceAddr},
    error::{FftKernelError, Result},
    types::{ComputeScheme, Direction, Placement, Precision},
};

/// Grid shape computed by the planner for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridParam {
    pub b_x: u32,
    pub b_y: u32,
    pub b_z: u32,
    pub tpb_x: u32,
    pub tpb_y: u32,
    pub tpb_z: u32,
    /// Dynamic shared memory per block
    pub lds_bytes: u32,
}

impl Default for GridParam {
    fn default() -> Self {
        Self {
            b_x: 1,
            b_y: 1,
            b_z: 1,
            tpb_x: 1,
            tpb_y: 1,
            tpb_z: 1,
            lds_bytes: 0,
        }
    }
}

impl GridParam {
    /// One-dimensional grid of `blocks` blocks with `threads` threads each.
    pub fn linear(blocks: u32, threads: u32) -> Self {
        Self {
            b_x: blocks,
            tpb_x: threads,
            ..Self::default()
        }
    }
}

/// One stage of a decomposed plan, read-only for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNode {
    pub precision: Precision,
    pub scheme: ComputeScheme,
    pub placement: Placement,
    /// -1 forward, +1 inverse. Anything else is rejected at dispatch.
    pub direction: i32,
    pub length: Vec<usize>,
    pub in_stride: Vec<usize>,
    pub out_stride: Vec<usize>,
    pub i_dist: usize,
    pub o_dist: usize,
    pub batch: usize,
    pub twiddles: DeviceAddr,
    pub twiddles_large: DeviceAddr,
    pub dev_kern_arg: ArgBlockPtr,
    pub grid_param: GridParam,
}

impl PlanNode {
    /// Contiguous node of the given lengths, forward, in-place, batch 1.
    pub fn new(precision: Precision, scheme: ComputeScheme, length: Vec<usize>) -> Self {
        let mut stride = Vec::with_capacity(length.len());
        let mut dist: usize = 1;
        for &len in &length {
            stride.push(dist);
            dist = dist.saturating_mul(len);
        }
        Self {
            precision,
            scheme,
            placement: Placement::InPlace,
            direction: Direction::Forward.into(),
            length,
            in_stride: stride.clone(),
            out_stride: stride,
            i_dist: dist,
            o_dist: dist,
            batch: 1,
            twiddles: DeviceAddr::NULL,
            twiddles_large: DeviceAddr::NULL,
            dev_kern_arg: ArgBlockPtr::default(),
            grid_param: GridParam::default(),
        }
    }

    pub fn direction(&self) -> Result<Direction> {
        Direction::try_from(self.direction)
    }
}

/// Snapshot valid for the duration of one dispatch call.
///
/// Slot 1 of each buffer array is reserved and never read.
#[derive(Debug, Clone, Copy)]
pub struct DeviceCallIn<'a> {
    pub node: &'a PlanNode,
    pub buf_in: [DeviceAddr; 2],
    pub buf_out: [DeviceAddr; 2],
    pub grid_param: GridParam,
}

impl<'a> DeviceCallIn<'a> {
    /// Snapshot for an in-place node; the grid is copied from the node.
    pub fn in_place(node: &'a PlanNode, buf: DeviceAddr) -> Self {
        Self {
            node,
            buf_in: [buf, DeviceAddr::NULL],
            buf_out: [DeviceAddr::NULL; 2],
            grid_param: node.grid_param,
        }
    }

    pub fn out_of_place(node: &'a PlanNode, input: DeviceAddr, output: DeviceAddr) -> Self {
        Self {
            node,
            buf_in: [input, DeviceAddr::NULL],
            buf_out: [output, DeviceAddr::NULL],
            grid_param: node.grid_param,
        }
    }

    pub(crate) fn input(&self) -> Result<DeviceAddr> {
        let buf = self.buf_in[0];
        if buf.is_null() {
            return Err(FftKernelError::MissingBuffer("bufIn[0]"));
        }
        Ok(buf)
    }

    pub(crate) fn output(&self) -> Result<DeviceAddr> {
        let buf = self.buf_out[0];
        if buf.is_null() {
            return Err(FftKernelError::MissingBuffer("bufOut[0]"));
        }
        Ok(buf)
    }
}

/// Status of one dispatch call. `err == 0` is success.
///
/// Positive values are accelerator runtime codes passed through unchanged;
/// negative values are the `STATUS_*` rejections from [`crate::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceCallOut {
    pub err: i32,
}

impl DeviceCallOut {
    pub const SUCCESS: DeviceCallOut = DeviceCallOut { err: 0 };

    pub fn from_result(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self::SUCCESS,
            Err(e) => Self { err: e.status() },
        }
    }

    pub fn is_success(&self) -> bool {
        self.err == 0
    }

    /// Lift a nonzero status into an error at the public API boundary.
    ///
    /// Runtime codes become [`FftKernelError::LaunchError`]; local rejections
    /// keep their kind.
    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(FftKernelError::from_status(self.err))
        }
    }
}
