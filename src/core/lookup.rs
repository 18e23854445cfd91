use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::vm::{Vgpu, VmRecord};
use crate::errors::GpuEditResult;
use crate::gpu::profile::{GpuGroup, GroupRef, ProfileRef, VgpuProfile, VgpuRef, VmRef};

/// Read-only view of a connection's object cache.
///
/// Everything the selection logic knows about the pool comes through here,
/// so tests can hand it a fixed snapshot.
pub trait ResourceLookup {
    /// GPU groups in cache order; callers sort them.
    fn gpu_groups(&self) -> Vec<GpuGroup>;

    /// Enabled vGPU types of a group. References that do not resolve are skipped.
    fn enabled_vgpu_profiles(&self, group: &GroupRef) -> Vec<VgpuProfile>;

    fn resolve_group(&self, group: &GroupRef) -> Option<GpuGroup>;
    fn resolve_profile(&self, profile: &ProfileRef) -> Option<VgpuProfile>;
    fn resolve_vgpu(&self, vgpu: &VgpuRef) -> Option<Vgpu>;
    fn resolve_vm(&self, vm: &VmRef) -> Option<VmRecord>;

    /// Licence forbids virtualised (fractional) GPUs on this connection.
    fn fractional_vgpu_forbidden(&self) -> bool;

    /// Licence forbids GPU assignment altogether.
    fn gpu_feature_forbidden(&self) -> bool;

    /// Connected to a pool rather than a standalone server.
    fn is_pool(&self) -> bool;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenceRestrictions {
    #[serde(default)]
    pub restrict_gpu: bool,
    #[serde(default)]
    pub restrict_vgpu: bool,
}

/// In-memory cache of one connection, loadable from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// `None` for a standalone server.
    #[serde(default)]
    pub pool_name: Option<String>,
    #[serde(default)]
    pub licence: LicenceRestrictions,
    #[serde(default)]
    pub gpu_groups: Vec<GpuGroup>,
    #[serde(default)]
    pub vgpu_types: Vec<VgpuProfile>,
    #[serde(default)]
    pub vms: Vec<VmRecord>,
    #[serde(default)]
    pub vgpus: Vec<Vgpu>,
}

impl PoolSnapshot {
    pub fn load(path: &Path) -> GpuEditResult<Self> {
        info!("Loading pool snapshot from {}", path.display());
        let raw = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&raw)?;
        debug!(
            groups = snapshot.gpu_groups.len(),
            vgpu_types = snapshot.vgpu_types.len(),
            vms = snapshot.vms.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> GpuEditResult<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        info!("Pool snapshot written to {}", path.display());
        Ok(())
    }

    /// Find a VM by opaque reference or by name label.
    pub fn find_vm(&self, name_or_ref: &str) -> Option<&VmRecord> {
        self.vms
            .iter()
            .find(|vm| vm.opaque_ref.as_str() == name_or_ref)
            .or_else(|| self.vms.iter().find(|vm| vm.name_label == name_or_ref))
    }

    pub fn vm_mut(&mut self, vm: &VmRef) -> Option<&mut VmRecord> {
        self.vms.iter_mut().find(|v| &v.opaque_ref == vm)
    }
}

impl ResourceLookup for PoolSnapshot {
    fn gpu_groups(&self) -> Vec<GpuGroup> {
        self.gpu_groups.clone()
    }

    fn enabled_vgpu_profiles(&self, group: &GroupRef) -> Vec<VgpuProfile> {
        self.resolve_group(group)
            .map(|g| {
                g.enabled_vgpu_types
                    .iter()
                    .filter_map(|r| self.resolve_profile(r))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn resolve_group(&self, group: &GroupRef) -> Option<GpuGroup> {
        self.gpu_groups.iter().find(|g| &g.opaque_ref == group).cloned()
    }

    fn resolve_profile(&self, profile: &ProfileRef) -> Option<VgpuProfile> {
        self.vgpu_types.iter().find(|p| &p.opaque_ref == profile).cloned()
    }

    fn resolve_vgpu(&self, vgpu: &VgpuRef) -> Option<Vgpu> {
        self.vgpus.iter().find(|v| &v.opaque_ref == vgpu).cloned()
    }

    fn resolve_vm(&self, vm: &VmRef) -> Option<VmRecord> {
        self.vms.iter().find(|v| &v.opaque_ref == vm).cloned()
    }

    fn fractional_vgpu_forbidden(&self) -> bool {
        self.licence.restrict_vgpu
    }

    fn gpu_feature_forbidden(&self) -> bool {
        self.licence.restrict_gpu
    }

    fn is_pool(&self) -> bool {
        self.pool_name.is_some()
    }
}
