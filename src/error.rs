//! Error types for the transient circuit simulator.
//!
//! This module provides a unified error type [`SimError`] covering netlist
//! parsing, circuit allocation, and the numerical core's own failure modes.

use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Unified error type for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum SimError {
    // ============ Numerical core ============
    /// Gauss-Jordan elimination hit a pivot below the singularity threshold.
    #[error("singular system at t={t:.6e}: no usable pivot in column {pivot}")]
    SingularSystem { t: f64, pivot: usize },

    /// Newton-Raphson failed to converge even after randomized restarts.
    #[error("no convergence at t={t:.6e} after {restarts} restarts")]
    NoConvergence { t: f64, restarts: usize },

    /// A `K` device references an `L` name that was never declared.
    #[error("coupling '{name}' references an unknown inductor")]
    CouplingReferencesUnknownInductor { name: String },

    /// Extra-variable allocation exceeded the configured bound.
    #[error("too many unknowns: limit is {limit}")]
    TooManyVariables { limit: usize },

    /// The first token of a netlist line did not match any known device.
    #[error("unknown device token '{token}'")]
    UnknownDevice { token: String },

    /// An `L` device using Forward Euler participates in a `K` coupling or
    /// an inductive-only cutset, where FE's behavior is undefined.
    #[error("device '{name}' uses FE but participates in a mutual coupling, which FE does not support")]
    UnsupportedFeCoupling { name: String },

    // ============ Netlist / CLI layer ============
    /// The netlist file could not be opened.
    #[error("circuit file '{path}' not found: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A netlist line could not be tokenized or parsed into a device.
    #[error("parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },
}

impl SimError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Process exit code per the CLI's documented mapping.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::SingularSystem { .. } => 2,
            SimError::NoConvergence { .. } => 3,
            SimError::TooManyVariables { .. } => 4,
            SimError::FileNotFound { .. } => 1,
            SimError::ParseError { .. }
            | SimError::CouplingReferencesUnknownInductor { .. }
            | SimError::UnknownDevice { .. }
            | SimError::UnsupportedFeCoupling { .. } => 1,
        }
    }
}
