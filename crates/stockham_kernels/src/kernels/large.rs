//! Large lengths split across blocks, with column or row communication.
//!
//! Both families only exist out-of-place with unit stride, so the node's
//! `placement` and strides do not take part in selection. Routing an in-place
//! node here is the planner's responsibility; it is accepted with a warning.

use crate::{
    error::Result,
    kernels::{dims, macros::lengths, Variant},
    launch::{KernelArg, KernelLaunch},
    plan::DeviceCallIn,
    types::{Direction, Placement},
};
use tracing::warn;

lengths!(sbcc_sizes: 64, 81, 128, 200, 256);
lengths!(sbrc_sizes: 64, 81, 128, 200, 256);

/// Block column communication.
///
/// # Kernel signature
/// `(twiddles, twiddles_large, dims, lengths, in_strides, out_strides, batch, buf_in, buf_out)`
pub fn select_block_column(data: &DeviceCallIn<'_>) -> Result<KernelLaunch> {
    select_large(data, true, |direction| Variant::BlockColumn { direction })
}

/// Block row communication. Same as the column family minus `twiddles_large`.
///
/// # Kernel signature
/// `(twiddles, dims, lengths, in_strides, out_strides, batch, buf_in, buf_out)`
pub fn select_block_row(data: &DeviceCallIn<'_>) -> Result<KernelLaunch> {
    select_large(data, false, |direction| Variant::BlockRow { direction })
}

fn select_large(
    data: &DeviceCallIn<'_>,
    large_twiddles: bool,
    variant: impl FnOnce(Direction) -> Variant,
) -> Result<KernelLaunch> {
    let node = data.node;
    let direction = node.direction()?;
    let variant = variant(direction);
    if node.placement == Placement::InPlace {
        warn!(family = %variant.family(), "in-place node routed to an out-of-place only family");
    }
    let kern_arg = node.dev_kern_arg;

    let mut args = Vec::with_capacity(9);
    args.push(KernelArg::Ptr(node.twiddles));
    if large_twiddles {
        args.push(KernelArg::Ptr(node.twiddles_large));
    }
    args.extend([
        KernelArg::Size(dims(node)?),
        KernelArg::Ptr(kern_arg.lengths()),
        KernelArg::Ptr(kern_arg.in_strides()?),
        KernelArg::Ptr(kern_arg.out_strides()?),
        KernelArg::Size(node.batch),
        KernelArg::Ptr(data.input()?),
        KernelArg::Ptr(data.output()?),
    ]);

    Ok(KernelLaunch::linear(variant, &data.grid_param, args))
}
