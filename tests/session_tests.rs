mod common;

use common::*;
use vgpu_edit::core::{GpuEditSession, LicenceRestrictions, NoGpuRubric, PoolSnapshot, PowerState};
use vgpu_edit::gpu::{GroupRef, ProfileRef, ProfileTuple, VmRef, PASSTHROUGH_LABEL};
use vgpu_edit::GpuEditError;

#[test]
fn preselects_current_assignment() {
    let snapshot = scenario_pool(PowerState::Halted, Some("P2"));
    let session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();

    assert_eq!(session.selected_index(), Some(3));
    assert!(!session.has_changed());
    assert_eq!(session.sub_text(), "B Y");
    assert_eq!(
        session.page_summary(),
        vec![("GPU".to_string(), "B Y".to_string())]
    );
    assert!(session.valid_to_save());
}

#[test]
fn selecting_passthrough_from_nothing_warns() {
    let snapshot = scenario_pool(PowerState::Halted, None);
    let mut session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();
    assert_eq!(session.selected_index(), Some(0));
    assert_eq!(session.sub_text(), "");

    let picked = session.select(2).unwrap();
    assert_eq!(picked.label(), PASSTHROUGH_LABEL);
    assert!(session.has_changed());

    let warnings = session.warnings();
    assert!(warnings.passthrough_rdp_warning);
    assert!(warnings.driver_required);
    assert!(!warnings.vm_must_be_stopped);

    let command = session.save_settings();
    assert_eq!(command.vm, VmRef::new("VM"));
    assert_eq!(command.gpu_group, Some(GroupRef::new("G")));
    assert_eq!(command.vgpu_type, Some(ProfileRef::new("P1")));
}

#[test]
fn running_vm_refuses_new_selection() {
    let snapshot = scenario_pool(PowerState::Running, Some("P1"));
    let mut session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();

    let warnings = session.warnings();
    assert!(warnings.vm_must_be_stopped);
    assert!(warnings.selection_disabled);

    let err = session.select(0).unwrap_err();
    assert!(matches!(err, GpuEditError::SelectionDisabled { .. }));
    assert_eq!(session.selected_index(), Some(2));

    // saving what is already selected is still allowed
    assert!(session.valid_to_save());
    assert_eq!(session.save_settings().vgpu_type, Some(ProfileRef::new("P1")));
}

#[test]
fn out_of_range_and_foreign_selections() {
    let snapshot = scenario_pool(PowerState::Halted, None);
    let mut session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();

    let err = session.select(10).unwrap_err();
    assert!(matches!(err, GpuEditError::ChoiceOutOfRange { index: 10, len: 4 }));

    let foreign = ProfileTuple::GroupDefault { group: group("other", "Other", &[]) };
    let err = session.select_tuple(&foreign).unwrap_err();
    assert!(matches!(err, GpuEditError::NotInCatalog { .. }));

    session.select_tuple(&ProfileTuple::NoGpu).unwrap();
    assert!(!session.has_changed());
}

#[test]
fn rubric_depends_on_pool_or_server() {
    let mut snapshot = PoolSnapshot {
        vms: vec![vm("VM", PowerState::Halted, &[])],
        ..Default::default()
    };
    let session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();
    assert!(!session.gpus_available());
    assert_eq!(session.rubric(), Some(NoGpuRubric::Server));
    assert_eq!(session.selected(), None);
    assert!(!session.has_changed());
    assert!(!session.warnings().any());
    assert!(session.page_summary().is_empty());

    snapshot.pool_name = Some("lab".into());
    let session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();
    assert_eq!(session.rubric(), Some(NoGpuRubric::Pool));
}

#[test]
fn stale_assignment_leaves_nothing_selected() {
    // the VM points at a type the group no longer enables
    let mut snapshot = scenario_pool(PowerState::Halted, Some("P1"));
    snapshot.gpu_groups[0].enabled_vgpu_types = vec![ProfileRef::new("P2")];

    let session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();
    assert!(matches!(session.current(), ProfileTuple::GroupSpecific { .. }));
    assert_eq!(session.selected(), None);
    assert!(!session.has_changed());
}

#[test]
fn entry_preconditions() {
    let snapshot = scenario_pool(PowerState::Halted, None);
    let err = GpuEditSession::open(&VmRef::new("missing"), &snapshot).unwrap_err();
    assert!(matches!(err, GpuEditError::VmNotFound { .. }));

    let mut restricted = snapshot.clone();
    restricted.licence = LicenceRestrictions {
        restrict_gpu: true,
        restrict_vgpu: false,
    };
    let err = GpuEditSession::open(&VmRef::new("VM"), &restricted).unwrap_err();
    assert!(matches!(err, GpuEditError::GpuFeatureRestricted { .. }));
}

#[test]
fn licence_restriction_preselects_group_default() {
    let mut snapshot = scenario_pool(PowerState::Halted, Some("P2"));
    restrict_vgpu(&mut snapshot);

    let session = GpuEditSession::open(&VmRef::new("VM"), &snapshot).unwrap();
    assert_eq!(session.catalog().len(), 2);
    assert_eq!(session.selected_index(), Some(1));
    assert_eq!(session.sub_text(), "Group G");
    assert_eq!(session.save_settings().vgpu_type, None);
}
