//! Pipeline components: context, watch loop, workers, delivery.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod scan;
pub mod workers;

pub use context::{
    LineOutcome, PipelineChannels, PipelineHandles, PipelineTuning, WatchContext,
    create_pipeline_channels,
};
pub use error_handler::report_scan_failures;
pub use orchestrator::{
    DeliveryStats, deliver_outcomes, resolve_tuning, run_pipeline, shutdown_pipeline,
};
pub use scan::{run_watch_loop, spawn_watch_thread};
pub use workers::spawn_file_workers;
