use serde::Serialize;

use super::tuple::ProfileTuple;
use crate::core::vm::PowerState;

/// Advisory signals for the GPU page. None of them blocks saving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarningState {
    /// Reassignment needs the VM shut down.
    pub vm_must_be_stopped: bool,
    /// The VM will not start unless a GPU of the selected group is free.
    pub gpu_unavailable: bool,
    /// The guest needs a matching GPU driver.
    pub driver_required: bool,
    /// Moving onto a whole GPU drops remote console access until guest tools are in.
    pub passthrough_rdp_warning: bool,
    pub selection_disabled: bool,
}

impl WarningState {
    pub fn any(&self) -> bool {
        self.vm_must_be_stopped
            || self.gpu_unavailable
            || self.driver_required
            || self.passthrough_rdp_warning
            || self.selection_disabled
    }
}

/// Structural inequality; no selection never counts as a change.
pub fn has_changed(selected: Option<&ProfileTuple>, current: &ProfileTuple) -> bool {
    selected.is_some_and(|s| s != current)
}

pub fn evaluate_warnings(
    gpus_available: bool,
    power_state: PowerState,
    current: &ProfileTuple,
    selected: Option<&ProfileTuple>,
) -> WarningState {
    if !gpus_available {
        return WarningState::default();
    }

    if !power_state.is_halted() {
        return WarningState {
            vm_must_be_stopped: true,
            selection_disabled: true,
            ..Default::default()
        };
    }

    // Only a move from "no GPU" counts here; switching between two
    // passthrough groups stays silent.
    let passthrough_rdp_warning = has_changed(selected, current)
        && current.is_no_gpu()
        && selected.is_some_and(|s| !s.is_no_gpu() && !s.is_fractional_vgpu());

    let gpu_selected = selected.is_some_and(|s| !s.is_no_gpu());

    WarningState {
        vm_must_be_stopped: false,
        gpu_unavailable: gpu_selected,
        driver_required: gpu_selected,
        passthrough_rdp_warning,
        selection_disabled: false,
    }
}
