pub mod settings;

pub use settings::{generate_default_config, LoggingSettings, PresentationSettings, Settings, SnapshotSettings};
