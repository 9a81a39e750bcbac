use crate::{
    error::Result,
    kernels::{dims, macros::lengths, Variant},
    launch::{KernelArg, KernelLaunch},
    plan::DeviceCallIn,
    types::{Placement, StrideClass},
};

lengths!(
    sizes: 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 3, 9, 27, 81, 243, 729, 2187, 5, 25, 125, 625,
    3125
);

/// Select a single-pass Stockham kernel for lengths that fit one kernel.
///
/// Branches on placement, then stride class (`in_stride[0] == 1 && out_stride[0] == 1`),
/// then direction. The grid is taken from the snapshot without change.
///
/// # Kernel signature
/// - in-place: `(twiddles, dims, lengths, in_strides, batch, buf)`
/// - out-of-place: `(twiddles, dims, lengths, in_strides, out_strides, batch, buf_in, buf_out)`
///
/// In-place launches never read `buf_out`.
pub fn select(data: &DeviceCallIn<'_>) -> Result<KernelLaunch> {
    let node = data.node;
    let direction = node.direction()?;
    let stride = StrideClass::classify(&node.in_stride, &node.out_stride)?;
    let kern_arg = node.dev_kern_arg;

    let mut args = vec![
        KernelArg::Ptr(node.twiddles),
        KernelArg::Size(dims(node)?),
        KernelArg::Ptr(kern_arg.lengths()),
        KernelArg::Ptr(kern_arg.in_strides()?),
    ];
    match node.placement {
        Placement::InPlace => {
            args.push(KernelArg::Size(node.batch));
            args.push(KernelArg::Ptr(data.input()?));
        },
        Placement::OutOfPlace => {
            args.push(KernelArg::Ptr(kern_arg.out_strides()?));
            args.push(KernelArg::Size(node.batch));
            args.push(KernelArg::Ptr(data.input()?));
            args.push(KernelArg::Ptr(data.output()?));
        },
    }

    let variant = Variant::Stockham {
        direction,
        placement: node.placement,
        stride,
    };
    Ok(KernelLaunch::linear(variant, &data.grid_param, args))
}
