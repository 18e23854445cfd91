use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::profile::{GpuGroup, GroupRef, ProfileRef, VgpuProfile};

/// One selectable GPU configuration for a VM.
///
/// Equality and hashing only look at references: two tuples are equal when
/// they name the same group (or both none) and the same *set* of profiles,
/// whatever the order of the aggregate list.
#[derive(Debug, Clone)]
pub enum ProfileTuple {
    /// No GPU assigned.
    NoGpu,
    /// The whole group, letting the platform pick (or passthrough).
    GroupDefault { group: GpuGroup },
    /// Any of these profiles; kept in catalog order.
    GroupAggregate {
        group: GpuGroup,
        profiles: Vec<VgpuProfile>,
    },
    /// Exactly one profile of the group.
    GroupSpecific {
        group: GpuGroup,
        profile: VgpuProfile,
    },
}

impl ProfileTuple {
    /// Build from a nullable group and a profile list.
    ///
    /// # Panics
    ///
    /// Panics when `group` is `None` but `profiles` is not empty: no code path
    /// produces such a pair, so it can only be a caller bug.
    pub fn from_parts(group: Option<GpuGroup>, mut profiles: Vec<VgpuProfile>) -> Self {
        let Some(group) = group else {
            assert!(
                profiles.is_empty(),
                "a tuple without a GPU group cannot carry vGPU profiles"
            );
            return ProfileTuple::NoGpu;
        };

        match profiles.len() {
            0 => ProfileTuple::GroupDefault { group },
            1 => ProfileTuple::GroupSpecific {
                group,
                profile: profiles.remove(0),
            },
            _ => ProfileTuple::GroupAggregate { group, profiles },
        }
    }

    pub fn group(&self) -> Option<&GpuGroup> {
        match self {
            ProfileTuple::NoGpu => None,
            ProfileTuple::GroupDefault { group }
            | ProfileTuple::GroupAggregate { group, .. }
            | ProfileTuple::GroupSpecific { group, .. } => Some(group),
        }
    }

    pub fn group_ref(&self) -> Option<&GroupRef> {
        self.group().map(|g| &g.opaque_ref)
    }

    pub fn profiles(&self) -> &[VgpuProfile] {
        match self {
            ProfileTuple::NoGpu | ProfileTuple::GroupDefault { .. } => &[],
            ProfileTuple::GroupAggregate { profiles, .. } => profiles,
            ProfileTuple::GroupSpecific { profile, .. } => std::slice::from_ref(profile),
        }
    }

    pub fn is_no_gpu(&self) -> bool {
        matches!(self, ProfileTuple::NoGpu)
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, ProfileTuple::GroupAggregate { .. })
    }

    /// True only for a single, virtualised (head count > 0) profile.
    pub fn is_fractional_vgpu(&self) -> bool {
        match self {
            ProfileTuple::GroupSpecific { profile, .. } => profile.max_heads > 0,
            _ => false,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ProfileTuple::NoGpu => String::new(),
            ProfileTuple::GroupDefault { group } => group.name_label.clone(),
            ProfileTuple::GroupAggregate { group, .. } => {
                format!("{} (multiple configurations)", group.name_label)
            }
            ProfileTuple::GroupSpecific { profile, .. } => profile.name(),
        }
    }

    fn identity(&self) -> (Option<&GroupRef>, BTreeSet<&ProfileRef>) {
        (
            self.group_ref(),
            self.profiles().iter().map(|p| &p.opaque_ref).collect(),
        )
    }
}

impl PartialEq for ProfileTuple {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ProfileTuple {}

impl Hash for ProfileTuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for ProfileTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
