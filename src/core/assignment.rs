use tracing::{debug, warn};

use crate::core::lookup::ResourceLookup;
use crate::core::vm::VmRecord;
use crate::gpu::tuple::ProfileTuple;

/// Work out what a VM currently has assigned.
///
/// Dangling references never fail: they fall back to the nearest safe tuple.
pub fn resolve_current<L: ResourceLookup + ?Sized>(vm: &VmRecord, lookup: &L) -> ProfileTuple {
    let Some(vgpu_ref) = vm.vgpus.first() else {
        return ProfileTuple::NoGpu;
    };

    let Some(vgpu) = lookup.resolve_vgpu(vgpu_ref) else {
        warn!(vm = %vm.opaque_ref, vgpu = %vgpu_ref, "vGPU record not found, treating VM as GPU-less");
        return ProfileTuple::NoGpu;
    };

    let Some(group) = lookup.resolve_group(&vgpu.gpu_group) else {
        warn!(vm = %vm.opaque_ref, group = %vgpu.gpu_group, "GPU group not found, treating VM as GPU-less");
        return ProfileTuple::NoGpu;
    };

    if lookup.fractional_vgpu_forbidden() {
        return ProfileTuple::GroupDefault { group };
    }

    match vgpu.vgpu_type.as_ref().and_then(|t| lookup.resolve_profile(t)) {
        Some(profile) => ProfileTuple::GroupSpecific { group, profile },
        None => {
            debug!(vm = %vm.opaque_ref, "vGPU type unresolved, using group default");
            ProfileTuple::GroupDefault { group }
        }
    }
}
