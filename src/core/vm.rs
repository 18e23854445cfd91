use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gpu::profile::{GroupRef, ProfileRef, VgpuRef, VmRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    Halted,
    Paused,
    Running,
    Suspended,
}

impl PowerState {
    pub fn is_halted(&self) -> bool {
        matches!(self, PowerState::Halted)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::Halted => write!(f, "Halted"),
            PowerState::Paused => write!(f, "Paused"),
            PowerState::Running => write!(f, "Running"),
            PowerState::Suspended => write!(f, "Suspended"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmRecord {
    pub opaque_ref: VmRef,
    pub name_label: String,
    pub power_state: PowerState,
    /// Only the first entry counts as the VM's assignment.
    #[serde(default, rename = "VGPUs")]
    pub vgpus: Vec<VgpuRef>,
}

/// A vGPU attached to a VM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vgpu {
    pub opaque_ref: VgpuRef,
    #[serde(rename = "VM")]
    pub vm: VmRef,
    #[serde(rename = "GPU_group")]
    pub gpu_group: GroupRef,
    /// `None` when the platform picked the type itself.
    #[serde(default, rename = "type")]
    pub vgpu_type: Option<ProfileRef>,
}
