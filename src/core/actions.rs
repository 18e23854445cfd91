use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::core::lookup::PoolSnapshot;
use crate::core::vm::Vgpu;
use crate::errors::{GpuEditError, GpuEditResult};
use crate::gpu::profile::{GroupRef, ProfileRef, VgpuRef, VmRef};
use crate::gpu::tuple::ProfileTuple;

/// What saving the GPU page asks the platform to do.
///
/// No group removes the VM's GPU; a group without a type lets the platform choose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuAssignCommand {
    pub vm: VmRef,
    pub gpu_group: Option<GroupRef>,
    pub vgpu_type: Option<ProfileRef>,
}

/// Aggregate selections carry their first (lowest capability) profile.
pub fn build_save_command(vm: &VmRef, selected: Option<&ProfileTuple>) -> GpuAssignCommand {
    GpuAssignCommand {
        vm: vm.clone(),
        gpu_group: selected.and_then(|t| t.group_ref()).cloned(),
        vgpu_type: selected
            .and_then(|t| t.profiles().first())
            .map(|p| p.opaque_ref.clone()),
    }
}

#[async_trait]
pub trait AssignmentExecutor: Send + Sync {
    async fn execute(&self, command: GpuAssignCommand) -> GpuEditResult<Option<VgpuRef>>;
}

/// Applies assignments to a shared in-memory snapshot.
#[derive(Clone)]
pub struct SnapshotExecutor {
    snapshot: Arc<Mutex<PoolSnapshot>>,
}

impl SnapshotExecutor {
    pub fn new(snapshot: Arc<Mutex<PoolSnapshot>>) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl AssignmentExecutor for SnapshotExecutor {
    /// Destroys the VM's vGPUs, then creates the new one if a group is given.
    async fn execute(&self, command: GpuAssignCommand) -> GpuEditResult<Option<VgpuRef>> {
        let mut snapshot = self.snapshot.lock().await;

        let vm = snapshot
            .vm_mut(&command.vm)
            .ok_or_else(|| GpuEditError::VmNotFound {
                vm: command.vm.to_string(),
            })?;
        if !vm.power_state.is_halted() {
            return Err(GpuEditError::VmNotHalted {
                vm: vm.name_label.clone(),
            });
        }

        let removed = std::mem::take(&mut vm.vgpus);
        snapshot.vgpus.retain(|v| !removed.contains(&v.opaque_ref));
        if !removed.is_empty() {
            info!(vm = %command.vm, count = removed.len(), "Destroyed existing vGPUs");
        }

        let Some(gpu_group) = command.gpu_group else {
            return Ok(None);
        };

        let vgpu_ref = VgpuRef::new(format!("OpaqueRef:{}", Uuid::new_v4()));
        snapshot.vgpus.push(Vgpu {
            opaque_ref: vgpu_ref.clone(),
            vm: command.vm.clone(),
            gpu_group: gpu_group.clone(),
            vgpu_type: command.vgpu_type.clone(),
        });
        if let Some(vm) = snapshot.vm_mut(&command.vm) {
            vm.vgpus.push(vgpu_ref.clone());
        }

        info!(
            vm = %command.vm,
            group = %gpu_group,
            vgpu = %vgpu_ref,
            "vGPU created"
        );
        Ok(Some(vgpu_ref))
    }
}
