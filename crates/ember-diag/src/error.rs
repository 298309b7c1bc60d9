//! Error types for reduction and diagnostics reporting.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use ember_core::Rank;

/// Errors from a collective operation across ranks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReduceError {
    /// A peer hung up before the collective completed.
    Disconnected {
        /// The peer whose channel closed.
        peer: Rank,
    },
    /// A peer contributed a buffer of the wrong length.
    LengthMismatch {
        /// The contributing peer.
        peer: Rank,
        /// Length of the local buffer.
        expected: usize,
        /// Length received.
        actual: usize,
    },
    /// The requested root is not a rank of the group.
    InvalidRoot {
        /// Requested root.
        root: Rank,
        /// Group size.
        size: usize,
    },
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected mid-collective"),
            Self::LengthMismatch {
                peer,
                expected,
                actual,
            } => write!(
                f,
                "rank {peer} sent {actual} values, expected {expected}"
            ),
            Self::InvalidRoot { root, size } => {
                write!(f, "root {root} out of range for a group of {size}")
            }
        }
    }
}

impl Error for ReduceError {}

/// Errors from computing or reporting integrated quantities.
#[derive(Debug)]
pub enum DiagnosticsError {
    /// The reduced total mass is zero or not finite, so centre-of-mass
    /// quantities are undefined.
    ZeroMass {
        /// The reduced mass.
        mass: f64,
    },
    /// The data log could not be opened for appending.
    LogOpen {
        /// Path of the data log.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Writing to a log sink failed.
    LogWrite(io::Error),
    /// A collective operation failed.
    Reduce(ReduceError),
    /// A diagnostics parameter is out of range.
    InvalidConfig {
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMass { mass } => {
                write!(f, "total mass {mass} is zero or not finite")
            }
            Self::LogOpen { path, source } => {
                write!(f, "failed to open {}: {source}", path.display())
            }
            Self::LogWrite(e) => write!(f, "failed to write diagnostics: {e}"),
            Self::Reduce(e) => write!(f, "reduction failed: {e}"),
            Self::InvalidConfig { reason } => write!(f, "invalid diagnostics config: {reason}"),
        }
    }
}

impl Error for DiagnosticsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LogOpen { source, .. } => Some(source),
            Self::LogWrite(e) => Some(e),
            Self::Reduce(e) => Some(e),
            Self::ZeroMass { .. } | Self::InvalidConfig { .. } => None,
        }
    }
}

impl From<ReduceError> for DiagnosticsError {
    fn from(e: ReduceError) -> Self {
        Self::Reduce(e)
    }
}

impl From<io::Error> for DiagnosticsError {
    fn from(e: io::Error) -> Self {
        Self::LogWrite(e)
    }
}
