//! Input/output operations, configuration and error handling

/// Command-line interface and batch runner
pub mod cli;
/// Generation constants and the preference snapshot
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG export of finished paintings
pub mod image;
/// Stamp directory loading
pub mod loader;
/// Progress reporting
pub mod progress;
