use tracing::{debug, info};

use crate::core::actions::{build_save_command, GpuAssignCommand};
use crate::core::assignment::resolve_current;
use crate::core::lookup::ResourceLookup;
use crate::core::vm::VmRecord;
use crate::errors::{GpuEditError, GpuEditResult};
use crate::gpu::catalog::{build_catalog, Catalog};
use crate::gpu::profile::VmRef;
use crate::gpu::tuple::ProfileTuple;
use crate::gpu::warnings::{evaluate_warnings, has_changed, WarningState};

/// Which "no GPUs" message to show instead of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoGpuRubric {
    Server,
    Pool,
}

impl NoGpuRubric {
    pub fn message(&self) -> &'static str {
        match self {
            NoGpuRubric::Server => "There are no GPUs available on this server.",
            NoGpuRubric::Pool => "There are no GPUs available in this pool.",
        }
    }
}

/// One edit of one VM's GPU settings.
///
/// Holds the catalog, the VM's current tuple and the selection; reopen the
/// session to pick up changes to the pool.
#[derive(Debug, Clone)]
pub struct GpuEditSession {
    vm: VmRecord,
    catalog: Catalog,
    current: ProfileTuple,
    selected: Option<usize>,
    is_pool: bool,
}

impl GpuEditSession {
    pub fn open<L: ResourceLookup + ?Sized>(vm: &VmRef, lookup: &L) -> GpuEditResult<Self> {
        let vm = lookup.resolve_vm(vm).ok_or_else(|| GpuEditError::VmNotFound {
            vm: vm.to_string(),
        })?;

        if lookup.gpu_feature_forbidden() {
            return Err(GpuEditError::GpuFeatureRestricted {
                vm: vm.name_label.clone(),
            });
        }

        let current = resolve_current(&vm, lookup);
        let catalog = build_catalog(lookup);
        let selected = catalog.position(&current);

        info!(
            vm = %vm.name_label,
            current = %current,
            entries = catalog.len(),
            preselected = ?selected,
            "GPU edit session opened"
        );

        Ok(Self {
            vm,
            catalog,
            current,
            selected,
            is_pool: lookup.is_pool(),
        })
    }

    pub fn vm(&self) -> &VmRecord {
        &self.vm
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current(&self) -> &ProfileTuple {
        &self.current
    }

    pub fn selected(&self) -> Option<&ProfileTuple> {
        self.selected.and_then(|i| self.catalog.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn gpus_available(&self) -> bool {
        !self.catalog.is_empty()
    }

    pub fn select(&mut self, index: usize) -> GpuEditResult<&ProfileTuple> {
        if self.warnings().selection_disabled {
            return Err(GpuEditError::SelectionDisabled {
                vm: self.vm.name_label.clone(),
            });
        }

        let len = self.catalog.len();
        let tuple = self
            .catalog
            .get(index)
            .ok_or(GpuEditError::ChoiceOutOfRange { index, len })?;

        debug!(vm = %self.vm.name_label, index, selection = %tuple, "GPU selection changed");
        self.selected = Some(index);
        Ok(tuple)
    }

    pub fn select_tuple(&mut self, tuple: &ProfileTuple) -> GpuEditResult<&ProfileTuple> {
        let index = self
            .catalog
            .position(tuple)
            .ok_or_else(|| GpuEditError::NotInCatalog {
                label: tuple.label(),
            })?;
        self.select(index)
    }

    pub fn has_changed(&self) -> bool {
        has_changed(self.selected(), &self.current)
    }

    pub fn warnings(&self) -> WarningState {
        evaluate_warnings(
            self.gpus_available(),
            self.vm.power_state,
            &self.current,
            self.selected(),
        )
    }

    pub fn rubric(&self) -> Option<NoGpuRubric> {
        if self.gpus_available() {
            return None;
        }
        Some(if self.is_pool {
            NoGpuRubric::Pool
        } else {
            NoGpuRubric::Server
        })
    }

    /// Label shown under the page title in the properties list.
    pub fn sub_text(&self) -> String {
        self.selected().map(|t| t.label()).unwrap_or_default()
    }

    pub fn page_summary(&self) -> Vec<(String, String)> {
        self.selected()
            .map(|t| vec![("GPU".to_string(), t.label())])
            .unwrap_or_default()
    }

    /// Every GPU warning is advisory.
    pub fn valid_to_save(&self) -> bool {
        true
    }

    pub fn save_settings(&self) -> GpuAssignCommand {
        build_save_command(&self.vm.opaque_ref, self.selected())
    }
}
