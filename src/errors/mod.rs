use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum GpuEditError {
    #[error("VM not found: {vm}")]
    VmNotFound {
        vm: String,
    },

    #[error("GPU assignment is not licensed for this connection (VM {vm})")]
    GpuFeatureRestricted {
        vm: String,
    },

    #[error("GPU selection is disabled while VM {vm} is not halted")]
    SelectionDisabled {
        vm: String,
    },

    #[error("VM {vm} must be halted before its GPU can be reassigned")]
    VmNotHalted {
        vm: String,
    },

    #[error("Choice {index} is out of range (catalog has {len} entries)")]
    ChoiceOutOfRange {
        index: usize,
        len: usize,
    },

    #[error("Selection is not part of the catalog: {label}")]
    NotInCatalog {
        label: String,
    },

    #[error("Snapshot Error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GpuEditError {
    /// Log the error with the operation it interrupted.
    pub fn log(&self, operation: &str) {
        error!(
            error = self.to_string(),
            operation,
            "Operation failed"
        );
    }
}

// Result type alias for convenience
pub type GpuEditResult<T> = Result<T, GpuEditError>;
