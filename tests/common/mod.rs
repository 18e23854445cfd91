#![allow(dead_code)]

use vgpu_edit::core::{LicenceRestrictions, PoolSnapshot, PowerState, Vgpu, VmRecord};
use vgpu_edit::gpu::{GpuGroup, GroupRef, ProfileRef, VgpuProfile, VgpuRef, VmRef};

pub fn profile(r: &str, vendor: &str, model: &str, max_heads: u32) -> VgpuProfile {
    VgpuProfile {
        opaque_ref: ProfileRef::new(r),
        vendor_name: vendor.into(),
        model_name: model.into(),
        max_heads,
    }
}

pub fn group(r: &str, name: &str, enabled: &[&str]) -> GpuGroup {
    let refs: Vec<ProfileRef> = enabled.iter().map(|e| ProfileRef::new(*e)).collect();
    GpuGroup {
        opaque_ref: GroupRef::new(r),
        name_label: name.into(),
        supported_vgpu_types: refs.clone(),
        enabled_vgpu_types: refs,
    }
}

pub fn vm(r: &str, power_state: PowerState, vgpus: &[&str]) -> VmRecord {
    VmRecord {
        opaque_ref: VmRef::new(r),
        name_label: format!("{}-name", r),
        power_state,
        vgpus: vgpus.iter().map(|v| VgpuRef::new(*v)).collect(),
    }
}

pub fn vgpu(r: &str, vm: &str, group: &str, vgpu_type: Option<&str>) -> Vgpu {
    Vgpu {
        opaque_ref: VgpuRef::new(r),
        vm: VmRef::new(vm),
        gpu_group: GroupRef::new(group),
        vgpu_type: vgpu_type.map(ProfileRef::new),
    }
}

/// One group G with P1 (passthrough, "A/X") and P2 (two heads, "B/Y").
pub fn scenario_pool(power_state: PowerState, assigned: Option<&str>) -> PoolSnapshot {
    let mut snapshot = PoolSnapshot {
        pool_name: Some("lab".into()),
        gpu_groups: vec![group("G", "Group G", &["P2", "P1"])],
        vgpu_types: vec![profile("P1", "A", "X", 0), profile("P2", "B", "Y", 2)],
        vms: vec![vm("VM", power_state, &[])],
        ..Default::default()
    };
    if let Some(profile_ref) = assigned {
        snapshot.vgpus.push(vgpu("V", "VM", "G", Some(profile_ref)));
        snapshot.vms[0].vgpus.push(VgpuRef::new("V"));
    }
    snapshot
}

pub fn restrict_vgpu(snapshot: &mut PoolSnapshot) {
    snapshot.licence = LicenceRestrictions {
        restrict_gpu: false,
        restrict_vgpu: true,
    };
}
