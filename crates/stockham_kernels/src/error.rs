//! Error types for FFT kernel dispatch

use crate::types::Precision;
use std::fmt;

// Local rejections use negative codes. Runtime result codes are never
// negative, so both can share the `err` field of a call result.

/// Generic failure status, used when no more specific code applies.
pub const STATUS_FAILURE: i32 = -1;
/// A plan attribute or buffer holds a value no kernel variant accepts.
pub const STATUS_INVALID_ARG_VALUE: i32 = -2;
/// Dimension count is zero, too small for the scheme, or does not fit the argument block.
pub const STATUS_INVALID_DIMENSIONS: i32 = -3;
/// Stride arrays are missing or inconsistent with the lengths.
pub const STATUS_INVALID_STRIDES: i32 = -5;

/// Error type for FFT kernel dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FftKernelError {
    /// Plan node direction is neither -1 (forward) nor +1 (inverse)
    InvalidDirection(i32),
    /// A plan value out of range for the launch (batch, extents, addresses)
    InvalidInput(String),
    /// Required device buffer is null
    MissingBuffer(&'static str),
    /// Too few or no dimensions for the selected kernel
    InvalidDimensions(String),
    /// Stride arrays empty or inconsistent with the lengths
    InvalidStrides(String),
    /// Dimension count does not fit into the argument block regions
    InvalidArgBlock { dims: usize, width: usize },
    /// Launch grid rejected before submission
    InvalidGrid { grid: (u32, u32, u32), block: (u32, u32, u32) },
    /// Node precision differs from the dispatch entry precision
    PrecisionMismatch { expected: Precision, got: Precision },
    /// No kernel registered for the requested variant
    MissingKernel(String),
    /// Node scheme does not belong to the dispatched family
    UnsupportedFamily(String),
    /// Accelerator launch or execution failure, `code` is the runtime's own result code
    LaunchError { code: i32, message: String },
    /// Device memory error
    MemoryError(String),
    /// Generic error message
    Message(String),
}

impl FftKernelError {
    /// Nonzero status code written into a [`DeviceCallOut`](crate::plan::DeviceCallOut).
    pub fn status(&self) -> i32 {
        match self {
            Self::InvalidDirection(_)
            | Self::InvalidInput(_)
            | Self::MissingBuffer(_)
            | Self::PrecisionMismatch { .. }
            | Self::InvalidGrid { .. }
            | Self::UnsupportedFamily(_) => STATUS_INVALID_ARG_VALUE,
            Self::InvalidArgBlock { .. } | Self::InvalidDimensions(_) => STATUS_INVALID_DIMENSIONS,
            Self::InvalidStrides(_) => STATUS_INVALID_STRIDES,
            // Runtime codes are reported verbatim; zero would read as success.
            Self::LaunchError { code, .. } if *code > 0 => *code,
            Self::LaunchError { .. } | Self::MissingKernel(_) | Self::MemoryError(_) | Self::Message(_) => {
                STATUS_FAILURE
            },
        }
    }

    /// Error for a nonzero status read back from a call result.
    ///
    /// Positive codes come from the accelerator runtime. Negative codes are
    /// local rejections and map back to their kind, so `status()` of the
    /// result equals `code`.
    pub fn from_status(code: i32) -> Self {
        match code {
            STATUS_INVALID_ARG_VALUE => Self::InvalidInput("rejected plan value".to_string()),
            STATUS_INVALID_DIMENSIONS => Self::InvalidDimensions("rejected plan dimensions".to_string()),
            STATUS_INVALID_STRIDES => Self::InvalidStrides("rejected plan strides".to_string()),
            c if c > 0 => Self::LaunchError {
                code: c,
                message: "transform execution failed".to_string(),
            },
            c => Self::Message(format!("transform failed with status {}", c)),
        }
    }
}

impl fmt::Display for FftKernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDirection(d) => write!(f, "invalid direction: {} (expected -1 or 1)", d),
            Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Self::MissingBuffer(which) => write!(f, "missing buffer: {} is null", which),
            Self::InvalidDimensions(msg) => write!(f, "invalid dimensions: {}", msg),
            Self::InvalidStrides(msg) => write!(f, "invalid strides: {}", msg),
            Self::InvalidArgBlock { dims, width } => {
                write!(f, "invalid argument block: {} dims do not fit width {}", dims, width)
            },
            Self::InvalidGrid { grid, block } => write!(f, "invalid launch grid: grid={:?}, block={:?}", grid, block),
            Self::PrecisionMismatch { expected, got } => {
                write!(f, "precision mismatch: expected {}, got {}", expected, got)
            },
            Self::MissingKernel(name) => write!(f, "missing kernel: {}", name),
            Self::UnsupportedFamily(msg) => write!(f, "unsupported kernel family: {}", msg),
            Self::LaunchError { code, message } => write!(f, "launch error ({}): {}", code, message),
            Self::MemoryError(msg) => write!(f, "memory error: {}", msg),
            Self::Message(msg) => write!(f, "message: {}", msg),
        }
    }
}

impl std::error::Error for FftKernelError {}

/// Result type for FFT kernel dispatch
pub type Result<T> = std::result::Result<T, FftKernelError>;
