use crate::{
    error::{FftKernelError, Result},
    kernels::{dims, Variant},
    launch::{KernelArg, KernelLaunch},
    plan::{DeviceCallIn, PlanNode},
    types::ComputeScheme,
};

/// Tile edge handled by one block.
pub const TRANSPOSE_DIM_X: u32 = 64;
/// Threads along y; each thread moves `TRANSPOSE_DIM_X / TRANSPOSE_DIM_Y` rows.
pub const TRANSPOSE_DIM_Y: u32 = 16;

/// Matrix view of a node for the tiled transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransposeShape {
    pub m: usize,
    pub n: usize,
    pub ld_in: usize,
    pub ld_out: usize,
    /// 0 plain, 1 XY_Z, 2 Z_XY
    pub scheme: i32,
}

impl TransposeShape {
    pub fn for_node(node: &PlanNode) -> Result<Self> {
        let need = |n: usize| -> Result<()> {
            if node.length.len() < n || node.in_stride.len() < n || node.out_stride.len() < n {
                return Err(FftKernelError::InvalidDimensions(format!(
                    "{:?} needs {} dimensions, node has {}",
                    node.scheme,
                    n,
                    node.length.len()
                )));
            }
            Ok(())
        };
        let (len, is, os) = (&node.length, &node.in_stride, &node.out_stride);
        match node.scheme {
            ComputeScheme::TransposeXyZ => {
                need(3)?;
                Ok(Self {
                    m: len[2],
                    n: extent(len[0], len[1])?,
                    ld_in: is[2],
                    ld_out: os[1],
                    scheme: 1,
                })
            },
            ComputeScheme::TransposeZXy => {
                need(3)?;
                Ok(Self {
                    m: extent(len[1], len[2])?,
                    n: len[0],
                    ld_in: is[1],
                    ld_out: os[2],
                    scheme: 2,
                })
            },
            ComputeScheme::Transpose => {
                need(2)?;
                Ok(Self {
                    m: len[1],
                    n: len[0],
                    ld_in: is[1],
                    ld_out: os[1],
                    scheme: 0,
                })
            },
            scheme => Err(FftKernelError::UnsupportedFamily(format!(
                "{:?} is not a transpose scheme",
                scheme
            ))),
        }
    }
}

fn extent(a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b)
        .ok_or_else(|| FftKernelError::InvalidInput(format!("transpose extent {} x {} overflows", a, b)))
}

fn tiles(extent: usize) -> Result<u32> {
    let tiles = extent.saturating_sub(1) / TRANSPOSE_DIM_X as usize + 1;
    u32::try_from(tiles).map_err(|_| FftKernelError::InvalidInput(format!("transpose extent {} too large", extent)))
}

/// Select the tiled out-of-place transpose. Unlike the FFT families the grid is
/// derived here from the matrix shape, one block per 64x64 tile per batch.
///
/// `twiddles_large` is forwarded so the transpose can apply the large-length
/// twiddle multiply on the fly; a null table disables it.
///
/// # Kernel signature
/// `(buf_in, buf_out, twiddles_large, dims, lengths, in_strides, out_strides,
///   m, n, ld_in, ld_out, in_stride0, out_stride0, batch, scheme)`
pub fn select(data: &DeviceCallIn<'_>) -> Result<KernelLaunch> {
    let node = data.node;
    let shape = TransposeShape::for_node(node)?;
    let kern_arg = node.dev_kern_arg;
    let batch = u32::try_from(node.batch)
        .map_err(|_| FftKernelError::InvalidInput(format!("batch {} too large", node.batch)))?;

    let args = vec![
        KernelArg::Ptr(data.input()?),
        KernelArg::Ptr(data.output()?),
        KernelArg::Ptr(node.twiddles_large),
        KernelArg::Size(dims(node)?),
        KernelArg::Ptr(kern_arg.lengths()),
        KernelArg::Ptr(kern_arg.in_strides()?),
        KernelArg::Ptr(kern_arg.out_strides()?),
        KernelArg::Size(shape.m),
        KernelArg::Size(shape.n),
        KernelArg::Size(shape.ld_in),
        KernelArg::Size(shape.ld_out),
        KernelArg::Size(node.in_stride[0]),
        KernelArg::Size(node.out_stride[0]),
        KernelArg::Size(node.batch),
        KernelArg::I32(shape.scheme),
    ];

    Ok(KernelLaunch {
        variant: Variant::Transpose,
        grid: (tiles(shape.n)?, tiles(shape.m)?, batch),
        block: (TRANSPOSE_DIM_X, TRANSPOSE_DIM_Y, 1),
        shared_mem_bytes: 0,
        args,
    })
}
