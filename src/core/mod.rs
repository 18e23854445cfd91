pub mod actions;
pub mod assignment;
pub mod lookup;
pub mod session;
pub mod vm;

// exports for lazy devs like us
pub use actions::{build_save_command, AssignmentExecutor, GpuAssignCommand, SnapshotExecutor};
pub use assignment::resolve_current;
pub use lookup::{LicenceRestrictions, PoolSnapshot, ResourceLookup};
pub use session::{GpuEditSession, NoGpuRubric};
pub use vm::{PowerState, Vgpu, VmRecord};
