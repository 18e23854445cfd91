use tracing::{debug, info};

use super::profile::GpuGroup;
use super::tuple::ProfileTuple;
use crate::core::lookup::ResourceLookup;

/// Ordered list of selectable GPU configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<ProfileTuple>,
}

impl Catalog {
    /// An empty catalog means the pool (or server) has no GPUs at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ProfileTuple] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ProfileTuple> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProfileTuple> {
        self.entries.iter()
    }

    /// Index of the entry structurally equal to `tuple`.
    pub fn position(&self, tuple: &ProfileTuple) -> Option<usize> {
        self.entries.iter().position(|t| t == tuple)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ProfileTuple;
    type IntoIter = std::slice::Iter<'a, ProfileTuple>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub struct CatalogBuilder<'a, L: ResourceLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: ResourceLookup + ?Sized> CatalogBuilder<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    pub fn build(&self) -> Catalog {
        let mut groups = self.lookup.gpu_groups();
        if groups.is_empty() {
            info!("No GPU groups available, catalog is empty");
            return Catalog::default();
        }

        groups.sort_by(GpuGroup::default_cmp);
        let vgpu_forbidden = self.lookup.fractional_vgpu_forbidden();

        let mut entries = vec![ProfileTuple::NoGpu];
        for group in groups {
            if vgpu_forbidden {
                entries.push(ProfileTuple::GroupDefault { group });
                continue;
            }
            self.push_group(&mut entries, group);
        }

        debug!(
            entries = entries.len(),
            vgpu_forbidden,
            "GPU catalog built"
        );
        Catalog { entries }
    }

    fn push_group(&self, entries: &mut Vec<ProfileTuple>, group: GpuGroup) {
        let mut enabled = self.lookup.enabled_vgpu_profiles(&group.opaque_ref);
        if enabled.len() < 2 {
            entries.push(ProfileTuple::GroupDefault { group });
            return;
        }

        enabled.sort_by(|a, b| a.catalog_cmp(b));
        let singles: Vec<ProfileTuple> = enabled
            .iter()
            .map(|profile| ProfileTuple::GroupSpecific {
                group: group.clone(),
                profile: profile.clone(),
            })
            .collect();

        entries.push(ProfileTuple::GroupAggregate {
            group,
            profiles: enabled,
        });
        entries.extend(singles);
    }
}

pub fn build_catalog<L: ResourceLookup + ?Sized>(lookup: &L) -> Catalog {
    CatalogBuilder::new(lookup).build()
}
