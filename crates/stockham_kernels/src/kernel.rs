use crate::{
    cuda::*,
    error::{FftKernelError, Result},
    kernels::{large, small, DispatchKey, KernelVariant, Variant},
    source::Source,
    types::{Family, Precision, SizeClass},
};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Exported symbol of one compiled kernel variant.
///
/// Catalog names are derived at runtime, custom tables may use literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelName(Cow<'static, str>);

impl AsRef<str> for KernelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KernelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for KernelName {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for KernelName {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Where an available kernel variant lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelEntry {
    pub source: Source,
    pub name: KernelName,
}

/// Capability table: the kernel variants available to a dispatcher.
///
/// Built explicitly by the caller and handed to
/// [`Dispatcher::new`](crate::dispatch::Dispatcher::new).
#[derive(Debug, Clone, Default)]
pub struct KernelTable {
    entries: HashMap<KernelVariant, KernelEntry>,
}

impl KernelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in length of every family, in both precisions, under the
    /// default sources.
    pub fn with_catalog() -> Self {
        let mut table = Self::new();
        for precision in [Precision::Single, Precision::Double] {
            for &size in small::sizes::ALL {
                table.register(DispatchKey::new(size, precision, Family::Stockham));
            }
            for &size in large::sbcc_sizes::ALL {
                table.register(DispatchKey::new(size, precision, Family::BlockColumn));
            }
            for &size in large::sbrc_sizes::ALL {
                table.register(DispatchKey::new(size, precision, Family::BlockRow));
            }
            table.register(DispatchKey::new(SizeClass::Any, precision, Family::Transpose));
        }
        table
    }

    /// Register one variant under an explicit symbol name.
    pub fn insert(&mut self, variant: KernelVariant, source: Source, name: impl Into<KernelName>) -> &mut Self {
        self.entries.insert(
            variant,
            KernelEntry {
                source,
                name: name.into(),
            },
        );
        self
    }

    /// Register every variant of the key's family with derived names in the
    /// family's default source.
    pub fn register(&mut self, key: DispatchKey) -> &mut Self {
        self.register_in(key, Source::for_family(key.family))
    }

    pub fn register_in(&mut self, key: DispatchKey, source: Source) -> &mut Self {
        for variant in Variant::all(key.family) {
            let variant = KernelVariant::new(key, variant);
            let name = variant.kernel_name();
            self.insert(variant, source, name);
        }
        self
    }

    pub fn get(&self, variant: &KernelVariant) -> Option<&KernelEntry> {
        self.entries.get(variant)
    }

    pub fn contains(&self, variant: &KernelVariant) -> bool {
        self.entries.contains_key(variant)
    }

    /// Distinct dispatch keys, sorted.
    pub fn keys(&self) -> BTreeSet<DispatchKey> {
        self.entries.keys().map(|v| v.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type Ptxs = HashMap<Source, Ptx>;
type Modules = HashMap<Source, Arc<CudaModule>>;
type Functions = HashMap<(Source, KernelName), CudaFunction>;

fn poisoned<T>(e: PoisonError<T>) -> FftKernelError {
    FftKernelError::Message(format!("kernel cache lock poisoned: {}", e))
}

/// Compiled kernel code for one device context.
///
/// The host registers one PTX image per [`Source`] (the FFT bodies are built
/// outside this crate). A source is loaded into the context the first time one
/// of its kernels is launched, and resolved functions are kept for later
/// launches. Contexts do not share modules, so each needs its own `Kernels`.
#[derive(Debug, Default)]
pub struct Kernels {
    ptxs: RwLock<Ptxs>,
    modules: RwLock<Modules>,
    functions: RwLock<Functions>,
}

impl Kernels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the PTX image of a source. Modules already
    /// loaded from an earlier image stay in use.
    pub fn register_ptx(&self, source: Source, ptx: Ptx) -> Result<()> {
        self.ptxs.write().map_err(poisoned)?.insert(source, ptx);
        Ok(())
    }

    pub fn has_source(&self, source: Source) -> Result<bool> {
        Ok(self.ptxs.read().map_err(poisoned)?.contains_key(&source))
    }

    pub fn load_ptx(&self, source: Source) -> Result<Ptx> {
        self.ptxs
            .read()
            .map_err(poisoned)?
            .get(&source)
            .cloned()
            .ok_or_else(|| FftKernelError::MissingKernel(format!("no PTX registered for source {}", source)))
    }

    /// Module of `source` in `context`, loading the registered PTX on first use.
    pub fn load_module(&self, context: &Arc<CudaContext>, source: Source) -> Result<Arc<CudaModule>> {
        if let Some(module) = self.modules.read().map_err(poisoned)?.get(&source) {
            return Ok(module.clone());
        }

        let ptx = self.load_ptx(source)?;
        let mut modules = self.modules.write().map_err(poisoned)?;
        // another launch may have loaded it between the two locks
        if let Some(module) = modules.get(&source) {
            return Ok(module.clone());
        }
        let module = context.load_module(ptx).map_err(|e| FftKernelError::LaunchError {
            code: e.0 as i32,
            message: format!("failed to load module {}: {:?}", source, e),
        })?;
        info!(module = %source, "loaded PTX module");
        modules.insert(source, module.clone());
        Ok(module)
    }

    /// Resolve the symbol `name` of a kernel variant in its source module.
    pub fn load_function(&self, context: &Arc<CudaContext>, source: Source, name: &KernelName) -> Result<CudaFunction> {
        let key = (source, name.clone());
        if let Some(func) = self.functions.read().map_err(poisoned)?.get(&key) {
            return Ok(func.clone());
        }

        let func = self
            .load_module(context, source)?
            .load_function(name.as_ref())
            .map_err(|e| FftKernelError::MissingKernel(format!("{} in {}: {:?}", name, source, e)))?;
        self.functions.write().map_err(poisoned)?.insert(key, func.clone());
        Ok(func)
    }
}
