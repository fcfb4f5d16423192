pub mod backup;
pub mod engine;

pub use backup::{BackupManager, BackupReport};
pub use engine::{run_pipeline, CleanOptions, PipelineReport};
