use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Display name of every whole-GPU (zero head) profile.
pub const PASSTHROUGH_LABEL: &str = "Pass-through whole GPU";

macro_rules! opaque_ref {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_ref!(GroupRef);
opaque_ref!(ProfileRef);
opaque_ref!(VgpuRef);
opaque_ref!(VmRef);

/// A vGPU type a GPU group can hand out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VgpuProfile {
    pub opaque_ref: ProfileRef,
    pub vendor_name: String,
    pub model_name: String,
    /// 0 means the whole physical GPU is passed through.
    #[serde(default)]
    pub max_heads: u32,
}

impl VgpuProfile {
    pub fn name(&self) -> String {
        if self.is_passthrough() {
            return PASSTHROUGH_LABEL.to_string();
        }
        format!("{} {}", self.vendor_name, self.model_name)
    }

    pub fn is_passthrough(&self) -> bool {
        self.max_heads == 0
    }

    /// Catalog order: fewer heads first, then by name.
    pub fn catalog_cmp(&self, other: &Self) -> Ordering {
        self.max_heads
            .cmp(&other.max_heads)
            .then_with(|| self.name().cmp(&other.name()))
    }
}

/// A set of identical physical GPUs across the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuGroup {
    pub opaque_ref: GroupRef,
    pub name_label: String,
    #[serde(default)]
    pub supported_vgpu_types: Vec<ProfileRef>,
    #[serde(default)]
    pub enabled_vgpu_types: Vec<ProfileRef>,
}

impl GpuGroup {
    /// Default group order: by name, then by reference so equal names stay stable.
    pub fn default_cmp(&self, other: &Self) -> Ordering {
        self.name_label
            .cmp(&other.name_label)
            .then_with(|| self.opaque_ref.cmp(&other.opaque_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(r: &str, vendor: &str, model: &str, max_heads: u32) -> VgpuProfile {
        VgpuProfile {
            opaque_ref: ProfileRef::new(r),
            vendor_name: vendor.into(),
            model_name: model.into(),
            max_heads,
        }
    }

    #[test]
    fn test_passthrough_name_ignores_vendor() {
        let p = profile("OpaqueRef:1", "NVIDIA Corporation", "GRID K1", 0);
        assert_eq!(p.name(), PASSTHROUGH_LABEL);
        assert!(p.is_passthrough());
    }

    #[test]
    fn test_fractional_name_is_vendor_and_model() {
        let p = profile("OpaqueRef:2", "NVIDIA Corporation", "GRID K140Q", 2);
        assert_eq!(p.name(), "NVIDIA Corporation GRID K140Q");
        assert!(!p.is_passthrough());
    }

    #[test]
    fn test_catalog_order_heads_before_name() {
        let a = profile("a", "Z", "Z", 1);
        let b = profile("b", "A", "A", 4);
        let c = profile("c", "B", "B", 4);
        assert_eq!(a.catalog_cmp(&b), Ordering::Less);
        assert_eq!(b.catalog_cmp(&c), Ordering::Less);
        assert_eq!(c.catalog_cmp(&c), Ordering::Equal);
    }
}
