//! Argument block: the flat length/stride metadata read by every kernel.
//!
//! One contiguous array of `3 * KERN_ARGS_ARRAY_WIDTH` 64-bit elements:
//! - `[0..W)`: lengths, one per dimension
//! - `[W..2W)`: input strides, then the input batch distance at index `dims`
//! - `[2W..3W)`: output strides, then the output batch distance at index `dims`
//!
//! Unused slots are zero. Kernels receive three pointers into the block, so the
//! offsets here are part of the kernel ABI.

use crate::error::{FftKernelError, Result};
use std::fmt;

/// Width of one region in elements.
pub const KERN_ARGS_ARRAY_WIDTH: usize = 16;

/// Raw device address (`CUdeviceptr`). Opaque to this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DeviceAddr(pub u64);

impl DeviceAddr {
    pub const NULL: DeviceAddr = DeviceAddr(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Address `count` elements of `T` past `self`.
    pub fn add<T>(self, count: usize) -> Result<DeviceAddr> {
        count
            .checked_mul(std::mem::size_of::<T>())
            .and_then(|bytes| self.0.checked_add(bytes as u64))
            .map(DeviceAddr)
            .ok_or_else(|| FftKernelError::InvalidInput(format!("address {} + {} elements overflows", self, count)))
    }
}

impl fmt::Display for DeviceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Host-side packed argument block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernArgs {
    dims: usize,
    data: Vec<u64>,
}

impl KernArgs {
    /// Pack lengths, strides and batch distances into the fixed-width layout.
    pub fn new(
        lengths: &[usize],
        in_stride: &[usize],
        out_stride: &[usize],
        i_dist: usize,
        o_dist: usize,
    ) -> Result<Self> {
        let dims = lengths.len();
        if dims == 0 {
            return Err(FftKernelError::InvalidDimensions(
                "argument block needs at least one length".to_string(),
            ));
        }
        if in_stride.len() != dims || out_stride.len() != dims {
            return Err(FftKernelError::InvalidStrides(format!(
                "stride counts ({}, {}) do not match {} lengths",
                in_stride.len(),
                out_stride.len(),
                dims
            )));
        }
        // Distances occupy the slot after the last stride.
        if dims + 1 > KERN_ARGS_ARRAY_WIDTH {
            return Err(FftKernelError::InvalidArgBlock {
                dims,
                width: KERN_ARGS_ARRAY_WIDTH,
            });
        }

        let w = KERN_ARGS_ARRAY_WIDTH;
        let mut data = vec![0u64; 3 * w];
        for i in 0..dims {
            data[i] = lengths[i] as u64;
            data[w + i] = in_stride[i] as u64;
            data[2 * w + i] = out_stride[i] as u64;
        }
        data[w + dims] = i_dist as u64;
        data[2 * w + dims] = o_dist as u64;

        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn lengths(&self) -> &[u64] {
        &self.data[..KERN_ARGS_ARRAY_WIDTH]
    }

    pub fn in_strides(&self) -> &[u64] {
        &self.data[KERN_ARGS_ARRAY_WIDTH..2 * KERN_ARGS_ARRAY_WIDTH]
    }

    pub fn out_strides(&self) -> &[u64] {
        &self.data[2 * KERN_ARGS_ARRAY_WIDTH..]
    }

    /// The whole block, ready for a host-to-device copy.
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }
}

/// Device-side view of an argument block: one base pointer, three regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ArgBlockPtr {
    base: DeviceAddr,
    width: usize,
}

impl ArgBlockPtr {
    pub fn new(base: DeviceAddr) -> Self {
        Self::with_width(base, KERN_ARGS_ARRAY_WIDTH)
    }

    pub fn with_width(base: DeviceAddr, width: usize) -> Self {
        Self { base, width }
    }

    pub fn base(&self) -> DeviceAddr {
        self.base
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lengths(&self) -> DeviceAddr {
        self.base
    }

    pub fn in_strides(&self) -> Result<DeviceAddr> {
        self.base.add::<u64>(self.width)
    }

    pub fn out_strides(&self) -> Result<DeviceAddr> {
        self.base.add::<u64>(2 * self.width)
    }
}
