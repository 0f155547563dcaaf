//! Anvil Chain
//!
//! Pipeline construction engine. A [`ChainExecutor`] runs an ordered list of
//! [`ChainLink`]s against one [`Command`], turning stage seeds into a validated
//! pipeline graph ready to be saved.
//!
//! # Example
//!
//! ```no_run
//! use anvil_chain::PipelineCreator;
//! use anvil_core::domain::{JobSeed, ProjectId, StageSeed};
//! use anvil_core::dto::pipeline::CreatePipeline;
//!
//! # async fn run() -> Result<(), anvil_chain::ChainError> {
//! let creator = PipelineCreator::in_memory();
//! let seeds = vec![StageSeed::new(
//!     "build",
//!     0,
//!     vec![JobSeed::new("compile", vec!["make".to_string()])],
//! )];
//!
//! let outcome = creator
//!     .execute(ProjectId(1), CreatePipeline::new("main", "a1b2c3"), seeds, None)
//!     .await?;
//! assert!(outcome.is_created());
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod collaborators;
pub mod command;
pub mod error;
pub mod service;

pub use chain::{ChainExecutor, ChainLink, ChainStatus};
pub use command::{Command, SeedsBlock};
pub use error::{ChainError, Result};
pub use service::{PipelineCreator, PipelineOutcome};
