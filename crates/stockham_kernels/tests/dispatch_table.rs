mod common;

use common::*;
use stockham_kernels::{
    dispatch::device_function,
    error::{STATUS_FAILURE, STATUS_INVALID_ARG_VALUE, STATUS_INVALID_DIMENSIONS, STATUS_INVALID_STRIDES},
    kernels::{large, small},
    source::Source,
    ComputeScheme, DeviceCallIn, DeviceCallOut, Direction, DispatchConfig, DispatchKey, DispatchTable, Dispatcher,
    Family, FftKernelError, GridParam, KernelTable, KernelVariant, Placement, Precision, SizeClass, StrideClass,
    Variant,
};

#[test]
fn catalog_registers_every_variant() {
    let table = KernelTable::with_catalog();
    let stockham = small::sizes::ALL.len() * 8;
    let sbcc = large::sbcc_sizes::ALL.len() * 2;
    let sbrc = large::sbrc_sizes::ALL.len() * 2;
    assert_eq!(table.len(), 2 * (stockham + sbcc + sbrc + 1));

    let dispatch = DispatchTable::from_kernels(&table);
    let keys = 2 * (small::sizes::ALL.len() + large::sbcc_sizes::ALL.len() + large::sbrc_sizes::ALL.len() + 1);
    assert_eq!(dispatch.len(), keys);
    assert!(dispatch.contains(&DispatchKey::new(SizeClass::Any, Precision::Double, Family::Transpose)));
}

#[test]
fn kernel_names() {
    let key = DispatchKey::new(SizeClass::Len(4096), Precision::Double, Family::Stockham);
    let variant = KernelVariant::new(
        key,
        Variant::Stockham {
            direction: Direction::Inverse,
            placement: Placement::OutOfPlace,
            stride: StrideClass::NonUnit,
        },
    );
    assert_eq!(variant.kernel_name(), "fft_back_op_len4096_dp_nonunit");

    let key = DispatchKey::new(SizeClass::Any, Precision::Single, Family::Transpose);
    assert_eq!(
        KernelVariant::new(key, Variant::Transpose).kernel_name(),
        "transpose_tiled_sp"
    );
}

#[test]
fn explicit_table_limits_what_dispatches() {
    let key = DispatchKey::new(SizeClass::Len(64), Precision::Single, Family::Stockham);
    let mut table = KernelTable::new();
    table.insert(
        KernelVariant::new(
            key,
            Variant::Stockham {
                direction: Direction::Forward,
                placement: Placement::InPlace,
                stride: StrideClass::Unit,
            },
        ),
        Source("custom"),
        "my_fwd_64",
    );
    let d = Dispatcher::new(table, RecordingLauncher::default());

    let mut node = common::node(Precision::Single, ComputeScheme::Stockham, vec![64]);
    let data = DeviceCallIn::in_place(&node, BUF_IN);
    assert!(d.call(&key, &data).is_success());
    let rec = d.launcher().last();
    assert_eq!(rec.source, Source("custom"));
    assert_eq!(rec.kernel, "my_fwd_64");

    // registered key, unregistered variant
    node.direction = 1;
    let data = DeviceCallIn::in_place(&node, BUF_IN);
    assert!(matches!(d.try_call(&key, &data), Err(FftKernelError::MissingKernel(_))));

    // unregistered key
    let other = DispatchKey::new(SizeClass::Len(128), Precision::Single, Family::Stockham);
    assert_eq!(d.call(&other, &data).err, STATUS_FAILURE);
    assert_eq!(d.launcher().count(), 1);
}

#[test]
fn precision_mismatch_is_rejected() {
    let d = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::default());
    let node = common::node(Precision::Double, ComputeScheme::Stockham, vec![64]);
    let data = DeviceCallIn::in_place(&node, BUF_IN);
    let key = DispatchKey::new(SizeClass::Len(64), Precision::Single, Family::Stockham);

    assert_eq!(
        d.try_call(&key, &data),
        Err(FftKernelError::PrecisionMismatch {
            expected: Precision::Single,
            got: Precision::Double
        })
    );
}

#[test]
fn launch_failure_lands_in_call_result() {
    let d = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::failing(701));
    let node = common::node(Precision::Single, ComputeScheme::Stockham, vec![64]);
    let data = DeviceCallIn::in_place(&node, BUF_IN);

    let out = d.call_node(&data);
    assert_eq!(out, DeviceCallOut { err: 701 });
    assert!(matches!(
        out.into_result(),
        Err(FftKernelError::LaunchError { code: 701, .. })
    ));
}

#[test]
fn call_node_derives_key_from_scheme() {
    let d = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::default());

    let node = common::node(Precision::Single, ComputeScheme::Stockham, vec![81]);
    assert!(d.call_node(&DeviceCallIn::in_place(&node, BUF_IN)).is_success());
    assert_eq!(d.launcher().last().kernel, "fft_fwd_ip_len81_sp_unit");

    let node = common::node(Precision::Double, ComputeScheme::StockhamBlockRc, vec![200, 10]);
    assert!(d.call_node(&DeviceCallIn::out_of_place(&node, BUF_IN, BUF_OUT)).is_success());
    assert_eq!(d.launcher().last().kernel, "fft_fwd_op_len200_sbrc_dp");

    let mut node = common::node(Precision::Single, ComputeScheme::TransposeZXy, vec![4, 8, 16]);
    node.batch = 1;
    assert!(d.call_node(&DeviceCallIn::out_of_place(&node, BUF_IN, BUF_OUT)).is_success());
    assert_eq!(d.launcher().last().kernel, "transpose_tiled_sp");

    let key = DispatchKey::for_node(&node).unwrap();
    assert_eq!(key, DispatchKey::new(SizeClass::Any, Precision::Single, Family::Transpose));
}

#[test]
fn grid_validation() {
    let d = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::default())
        .with_config(DispatchConfig::default().with_max_threads_per_block(256));
    let mut node = common::node(Precision::Single, ComputeScheme::Stockham, vec![64]);

    node.grid_param = GridParam::linear(0, 64);
    let out = d.call_node(&DeviceCallIn::in_place(&node, BUF_IN));
    assert_eq!(out.err, STATUS_INVALID_ARG_VALUE);

    node.grid_param = GridParam::linear(4, 512);
    let err = d.try_call(&DispatchKey::for_node(&node).unwrap(), &DeviceCallIn::in_place(&node, BUF_IN));
    assert!(matches!(err, Err(FftKernelError::InvalidGrid { block: (512, 1, 1), .. })));
    assert_eq!(d.launcher().count(), 0);

    let lenient = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::default())
        .with_config(DispatchConfig::default().with_validate_grid(false));
    assert!(lenient.call_node(&DeviceCallIn::in_place(&node, BUF_IN)).is_success());
}

#[test]
fn device_function_per_family() {
    let node = common::node(Precision::Single, ComputeScheme::StockhamBlockCc, vec![64, 4]);
    let data = DeviceCallIn::out_of_place(&node, BUF_IN, BUF_OUT);

    let launch = device_function(Family::BlockColumn)(&data).unwrap();
    assert_eq!(launch.variant.family(), Family::BlockColumn);
    let launch = device_function(Family::BlockRow)(&data).unwrap();
    assert_eq!(launch.variant.family(), Family::BlockRow);
}

#[test]
fn call_out_round_trips_status() {
    assert_eq!(DeviceCallOut::from_result(&Ok(())), DeviceCallOut::SUCCESS);
    assert!(DeviceCallOut::SUCCESS.into_result().is_ok());
    let out = DeviceCallOut::from_result(&Err(FftKernelError::InvalidDirection(3)));
    assert_eq!(out.err, STATUS_INVALID_ARG_VALUE);
    // a zero runtime code must not read as success
    let out = DeviceCallOut::from_result(&Err(FftKernelError::LaunchError {
        code: 0,
        message: String::new(),
    }));
    assert_eq!(out.err, STATUS_FAILURE);
}

#[test]
fn runtime_codes_and_local_rejections_stay_distinct() {
    // CUDA_ERROR_OUT_OF_MEMORY
    let oom = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::failing(2));
    let node = common::node(Precision::Single, ComputeScheme::Stockham, vec![64]);
    let oom_out = oom.call_node(&DeviceCallIn::in_place(&node, BUF_IN));
    assert_eq!(oom_out.err, 2);

    let d = Dispatcher::new(KernelTable::with_catalog(), RecordingLauncher::default());
    let mut bad = common::node(Precision::Single, ComputeScheme::Stockham, vec![64]);
    bad.direction = 0;
    let bad_out = d.call_node(&DeviceCallIn::in_place(&bad, BUF_IN));
    assert_ne!(oom_out, bad_out);
    assert!(bad_out.err < 0);

    assert!(matches!(
        oom_out.into_result(),
        Err(FftKernelError::LaunchError { code: 2, .. })
    ));
    let err = bad_out.into_result().unwrap_err();
    assert!(!matches!(err, FftKernelError::LaunchError { .. }));
    assert_eq!(err.status(), STATUS_INVALID_ARG_VALUE);
}

#[test]
fn local_status_maps_back_to_its_kind() {
    for status in [
        STATUS_FAILURE,
        STATUS_INVALID_ARG_VALUE,
        STATUS_INVALID_DIMENSIONS,
        STATUS_INVALID_STRIDES,
        1,
        701,
    ] {
        let err = DeviceCallOut { err: status }.into_result().unwrap_err();
        assert_eq!(err.status(), status);
    }
    assert!(matches!(
        DeviceCallOut { err: STATUS_INVALID_STRIDES }.into_result(),
        Err(FftKernelError::InvalidStrides(_))
    ));
    assert!(matches!(
        DeviceCallOut { err: STATUS_INVALID_DIMENSIONS }.into_result(),
        Err(FftKernelError::InvalidDimensions(_))
    ));
}
