//! Panel image generation for Panelcraft.
//!
//! [`PanelImagePipeline`] renders every panel of a finalized script
//! concurrently. Each panel follows its own two-attempt protocol
//!
//! ```text
//! Loading -> Ready
//!         -> (warn, backoff) Retrying -> Ready | Failed
//! ```
//!
//! and reports every status change through a [`PanelStatusSink`] keyed by
//! panel index, so one panel's failure never blocks or aborts another.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pipeline;
mod sink;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use pipeline::{GenerationSummary, PanelImagePipeline};
pub use sink::{PanelStatusSink, RecordingSink};
