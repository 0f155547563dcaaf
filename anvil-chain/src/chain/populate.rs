//! Populate step
//!
//! Turns the command's stage seeds into the pipeline's stage and job graph,
//! then validates the result.

use async_trait::async_trait;
use std::sync::Arc;

use super::ChainLink;
use crate::collaborators::{IidAllocator, PipelineValidator};
use crate::command::Command;
use crate::error::{ChainError, Result};

/// Recorded when neither the seeds block nor the seeds produced a stage
pub const NO_STAGES: &str = "No stages / jobs for this pipeline.";

/// Recorded when the populated pipeline fails validation
pub const FAILED_TO_BUILD: &str = "Failed to build the pipeline!";

pub struct Populate {
    allocator: Arc<dyn IidAllocator>,
    validator: Arc<dyn PipelineValidator>,
}

impl Populate {
    pub fn new(allocator: Arc<dyn IidAllocator>, validator: Arc<dyn PipelineValidator>) -> Self {
        Self {
            allocator,
            validator,
        }
    }
}

#[async_trait]
impl ChainLink for Populate {
    fn name(&self) -> &'static str {
        "populate"
    }

    async fn perform(&self, command: &mut Command) -> Result<()> {
        ensure_not_persisted(command)?;

        // Reserved outside any save; a failed build leaves a gap in the sequence.
        if command.pipeline.iid.is_none() {
            let iid = self.allocator.next_iid(command.pipeline.project_id).await?;
            command.pipeline.iid = Some(iid);
        }

        // Assigned here rather than when the pipeline is built so ambiguous
        // refs do not fail seed generation.
        command.pipeline.protected = command.protected_ref();

        if let Some(block) = command.seeds_block.take() {
            block(&mut command.pipeline);
        }

        for seed in &command.stage_seeds {
            command.pipeline.stages.push(seed.to_resource());
        }

        if command.pipeline.stages.is_empty() {
            command.pipeline.add_error(NO_STAGES);
            return Ok(());
        }

        let violations = self.validator.validate(&command.pipeline).await?;
        if !violations.is_empty() {
            for violation in violations {
                command.pipeline.add_error(violation.message);
            }
            command.pipeline.add_error(FAILED_TO_BUILD);
            return Ok(());
        }

        ensure_not_persisted(command)?;

        tracing::debug!(
            "Pipeline #{} populated with {} stage(s), {} job(s)",
            command.pipeline.iid.unwrap_or_default(),
            command.pipeline.stages.len(),
            command.pipeline.job_count()
        );

        Ok(())
    }

    fn should_break(&self, command: &Command) -> bool {
        command.pipeline.has_errors()
    }
}

fn ensure_not_persisted(command: &Command) -> Result<()> {
    if command.pipeline.is_persisted() {
        return Err(ChainError::AlreadyPersisted {
            pipeline_id: command.pipeline.id,
        });
    }
    Ok(())
}
