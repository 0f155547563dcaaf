//! Core domain types
//!
//! These types describe a pipeline's static structure. The chain crate mutates
//! them while constructing a pipeline; persistence and execution live elsewhere.

pub mod job;
pub mod pipeline;
pub mod seed;
pub mod stage;

pub use job::{Job, When};
pub use pipeline::{Pipeline, PipelineSource, ProjectId};
pub use seed::{JobSeed, Rule, StageSeed};
pub use stage::Stage;
