//! Error types for generation, composition and painting operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum GenerationError {
    /// A selection query received an empty candidate sequence
    EmptyInput,

    /// Stamp composition was given degenerate input
    Composition {
        /// Name of the composition operation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// The run was cancelled
    ///
    /// Not a fault: a normal terminal outcome of an interrupted run. The
    /// controller converts it into a `None` result after reverting state.
    Cancelled,

    /// A stamp cache was mutated while a run was in flight
    CacheState {
        /// Description of the offending mutation
        reason: String,
    },

    /// Failed to load a stamp image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => {
                write!(f, "Selection query received no candidates")
            }
            Self::Composition { operation, reason } => {
                write!(f, "Composition error in {operation}: {reason}")
            }
            Self::Cancelled => {
                write!(f, "Generation cancelled")
            }
            Self::CacheState { reason } => {
                write!(f, "Cache mutated in an invalid state: {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a composition error
pub fn composition_error(operation: &'static str, reason: &impl ToString) -> GenerationError {
    GenerationError::Composition {
        operation,
        reason: reason.to_string(),
    }
}
