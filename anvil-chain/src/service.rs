//! Pipeline creation service
//!
//! Entry point for constructing a pipeline: builds the command, runs the
//! chain and reports one of three outcomes. A created pipeline and a
//! business failure come back as [`PipelineOutcome`]; fatal errors come back
//! as `Err`.

use std::sync::Arc;

use anvil_core::domain::{Pipeline, ProjectId, StageSeed};
use anvil_core::dto::pipeline::CreatePipeline;

use crate::chain::{ChainExecutor, ChainLink, ChainStatus, Create, Populate, ValidateRepository};
use crate::collaborators::{
    IidAllocator, InMemoryIidAllocator, InMemoryPipelineStore, PipelineStore, PipelineValidator,
    RefProtection, StructuralValidator, Unprotected,
};
use crate::command::{Command, SeedsBlock};
use crate::error::Result;

/// Result of a construction attempt that did not hit a fatal error
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The pipeline was populated, validated and saved
    Created(Pipeline),
    /// A business rule stopped construction; the pipeline keeps its partial state
    Failed {
        pipeline: Pipeline,
        errors: Vec<String>,
    },
}

impl PipelineOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn pipeline(&self) -> &Pipeline {
        match self {
            Self::Created(pipeline) | Self::Failed { pipeline, .. } => pipeline,
        }
    }

    pub fn into_pipeline(self) -> Pipeline {
        match self {
            Self::Created(pipeline) | Self::Failed { pipeline, .. } => pipeline,
        }
    }
}

/// Creates pipelines from seeds
///
/// Collaborators are injected so callers and tests can swap any of them.
pub struct PipelineCreator {
    ref_protection: Arc<dyn RefProtection>,
    executor: ChainExecutor,
}

impl PipelineCreator {
    pub fn new(
        allocator: Arc<dyn IidAllocator>,
        ref_protection: Arc<dyn RefProtection>,
        validator: Arc<dyn PipelineValidator>,
        store: Arc<dyn PipelineStore>,
    ) -> Self {
        let executor = ChainExecutor::new(default_links(allocator, validator, store));
        Self {
            ref_protection,
            executor,
        }
    }

    /// Creator backed entirely by in-memory collaborators
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryIidAllocator::new()),
            Arc::new(Unprotected),
            Arc::new(StructuralValidator),
            Arc::new(InMemoryPipelineStore::new()),
        )
    }

    /// Replace the default chain
    pub fn with_links(mut self, links: Vec<Box<dyn ChainLink>>) -> Self {
        self.executor = ChainExecutor::new(links);
        self
    }

    /// Link names of the chain this creator runs
    pub fn link_names(&self) -> Vec<&'static str> {
        self.executor.link_names()
    }

    /// Build a command for a new pipeline in `project`
    pub fn command(
        &self,
        project: ProjectId,
        attributes: CreatePipeline,
        seeds: Vec<StageSeed>,
        seeds_block: Option<SeedsBlock>,
    ) -> Command {
        let pipeline = Pipeline::new(project, &attributes);
        let command = Command::new(attributes, pipeline)
            .with_stage_seeds(seeds)
            .with_ref_protection(Arc::clone(&self.ref_protection));

        match seeds_block {
            Some(block) => command.with_seeds_block(block),
            None => command,
        }
    }

    /// Construct and save a new pipeline
    pub async fn execute(
        &self,
        project: ProjectId,
        attributes: CreatePipeline,
        seeds: Vec<StageSeed>,
        seeds_block: Option<SeedsBlock>,
    ) -> Result<PipelineOutcome> {
        let command = self.command(project, attributes, seeds, seeds_block);
        self.execute_command(command).await
    }

    /// Run the chain against a caller-built command
    pub async fn execute_command(&self, mut command: Command) -> Result<PipelineOutcome> {
        let status = self.executor.run(&mut command).await?;

        let pipeline = command.into_pipeline();

        match status {
            ChainStatus::Completed if !pipeline.has_errors() => {
                tracing::info!(
                    "Pipeline created: #{} in project {} ({} stages, {} jobs)",
                    pipeline.iid.unwrap_or_default(),
                    pipeline.project_id,
                    pipeline.stages.len(),
                    pipeline.job_count()
                );
                Ok(PipelineOutcome::Created(pipeline))
            }
            _ => {
                tracing::info!(
                    "Pipeline not created in project {}: {}",
                    pipeline.project_id,
                    pipeline.errors.join("; ")
                );
                let errors = pipeline.errors.clone();
                Ok(PipelineOutcome::Failed { pipeline, errors })
            }
        }
    }
}

/// The default chain: repository checks, populate, create
pub fn default_links(
    allocator: Arc<dyn IidAllocator>,
    validator: Arc<dyn PipelineValidator>,
    store: Arc<dyn PipelineStore>,
) -> Vec<Box<dyn ChainLink>> {
    vec![
        Box::new(ValidateRepository),
        Box::new(Populate::new(allocator, validator)),
        Box::new(Create::new(store)),
    ]
}
