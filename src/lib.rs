pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod gpu;

// Re-exports
pub use crate::core::{GpuAssignCommand, GpuEditSession, PoolSnapshot, ResourceLookup};
pub use errors::{GpuEditError, GpuEditResult};
pub use gpu::{Catalog, ProfileTuple, WarningState};
