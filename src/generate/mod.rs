//! Run orchestration, retained state and concurrent projection scheduling

/// The generation controller and its commit-on-success run state
pub mod controller;
