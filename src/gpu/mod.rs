pub mod catalog;
pub mod profile;
pub mod tuple;
pub mod warnings;

pub use catalog::{build_catalog, Catalog, CatalogBuilder};
pub use profile::{GpuGroup, GroupRef, ProfileRef, VgpuProfile, VgpuRef, VmRef, PASSTHROUGH_LABEL};
pub use tuple::ProfileTuple;
pub use warnings::{evaluate_warnings, has_changed, WarningState};
