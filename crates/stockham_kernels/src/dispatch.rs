//! Dispatch table and dispatcher.
//!
//! The planner picks a [`DispatchKey`] per plan node ahead of time. At execution
//! the dispatcher looks up the family's selection function, resolves the
//! selected variant through the capability table and hands the launch to a
//! [`KernelLauncher`]. No state survives between calls.

use crate::{
    config::DispatchConfig,
    error::{FftKernelError, Result},
    kernel::{KernelEntry, KernelTable},
    kernels::{large, small, transpose, DispatchKey, KernelVariant},
    launch::{KernelLaunch, KernelLauncher},
    plan::{DeviceCallIn, DeviceCallOut},
    types::Family,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Selection function of one kernel family.
pub type DeviceFunction = fn(&DeviceCallIn<'_>) -> Result<KernelLaunch>;

pub fn device_function(family: Family) -> DeviceFunction {
    match family {
        Family::Stockham => small::select,
        Family::BlockColumn => large::select_block_column,
        Family::BlockRow => large::select_block_row,
        Family::Transpose => transpose::select,
    }
}

#[derive(Clone, Default)]
pub struct DispatchTable {
    functions: HashMap<DispatchKey, DeviceFunction>,
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

impl DispatchTable {
    /// One entry per key present in the capability table.
    pub fn from_kernels(kernels: &KernelTable) -> Self {
        let functions = kernels
            .keys()
            .into_iter()
            .map(|key| (key, device_function(key.family)))
            .collect();
        Self { functions }
    }

    pub fn get(&self, key: &DispatchKey) -> Option<DeviceFunction> {
        self.functions.get(key).copied()
    }

    pub fn contains(&self, key: &DispatchKey) -> bool {
        self.functions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

pub struct Dispatcher<L> {
    kernels: KernelTable,
    table: DispatchTable,
    launcher: L,
    config: DispatchConfig,
}

impl<L: KernelLauncher> Dispatcher<L> {
    pub fn new(kernels: KernelTable, launcher: L) -> Self {
        let table = DispatchTable::from_kernels(&kernels);
        Self {
            kernels,
            table,
            launcher,
            config: DispatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kernels(&self) -> &KernelTable {
        &self.kernels
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Resolve the launch for `data` without submitting it.
    pub fn select(&self, key: &DispatchKey, data: &DeviceCallIn<'_>) -> Result<(KernelLaunch, &KernelEntry)> {
        if data.node.precision != key.precision {
            return Err(FftKernelError::PrecisionMismatch {
                expected: key.precision,
                got: data.node.precision,
            });
        }
        let function = self
            .table
            .get(key)
            .ok_or_else(|| FftKernelError::MissingKernel(format!("no dispatch entry for {:?}", key)))?;
        let launch = function(data)?;

        let variant = KernelVariant::new(*key, launch.variant);
        let entry = self
            .kernels
            .get(&variant)
            .ok_or_else(|| FftKernelError::MissingKernel(variant.kernel_name()))?;

        if self.config.validate_grid {
            self.validate_grid(&launch)?;
        }
        Ok((launch, entry))
    }

    pub fn try_call(&self, key: &DispatchKey, data: &DeviceCallIn<'_>) -> Result<()> {
        let (launch, entry) = self.select(key, data)?;
        debug!(
            kernel = %entry.name,
            source = %entry.source,
            grid = ?launch.grid,
            block = ?launch.block,
            num_args = launch.args.len(),
            "dispatching kernel"
        );
        self.launcher.launch(entry.source, &entry.name, &launch)
    }

    /// Dispatch one plan node, reporting failure through the status code.
    pub fn call(&self, key: &DispatchKey, data: &DeviceCallIn<'_>) -> DeviceCallOut {
        let result = self.try_call(key, data);
        if let Err(e) = &result {
            warn!(key = ?key, error = %e, "dispatch failed");
        }
        DeviceCallOut::from_result(&result)
    }

    /// Dispatch with the key derived from the node itself.
    pub fn call_node(&self, data: &DeviceCallIn<'_>) -> DeviceCallOut {
        match DispatchKey::for_node(data.node) {
            Ok(key) => self.call(&key, data),
            Err(e) => {
                warn!(error = %e, "no dispatch key for node");
                DeviceCallOut { err: e.status() }
            },
        }
    }

    fn validate_grid(&self, launch: &KernelLaunch) -> Result<()> {
        let (gx, gy, gz) = launch.grid;
        let (bx, by, bz) = launch.block;
        if gx == 0
            || gy == 0
            || gz == 0
            || bx == 0
            || by == 0
            || bz == 0
            || launch.threads_per_block() > self.config.max_threads_per_block as u64
        {
            return Err(FftKernelError::InvalidGrid {
                grid: launch.grid,
                block: launch.block,
            });
        }
        Ok(())
    }
}
