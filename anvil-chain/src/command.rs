//! Construction command
//!
//! The context shared by every link of one construction attempt. A command is
//! built once per attempt and never reused.

use std::fmt;
use std::sync::{Arc, OnceLock};

use anvil_core::domain::{Pipeline, StageSeed};
use anvil_core::dto::pipeline::CreatePipeline;

use crate::collaborators::{RefProtection, Unprotected};

/// Caller-supplied mutation run against the pipeline before seeds are materialized
pub type SeedsBlock = Box<dyn FnOnce(&mut Pipeline) + Send>;

/// Shared state of one construction attempt
pub struct Command {
    pub attributes: CreatePipeline,
    pub stage_seeds: Vec<StageSeed>,
    pub seeds_block: Option<SeedsBlock>,
    pub pipeline: Pipeline,
    ref_protection: Arc<dyn RefProtection>,
    protected_ref: OnceLock<bool>,
}

impl Command {
    pub fn new(attributes: CreatePipeline, pipeline: Pipeline) -> Self {
        Self {
            attributes,
            stage_seeds: Vec::new(),
            seeds_block: None,
            pipeline,
            ref_protection: Arc::new(Unprotected),
            protected_ref: OnceLock::new(),
        }
    }

    pub fn with_stage_seeds(mut self, seeds: Vec<StageSeed>) -> Self {
        self.stage_seeds = seeds;
        self
    }

    pub fn with_seeds_block(mut self, block: SeedsBlock) -> Self {
        self.seeds_block = Some(block);
        self
    }

    pub fn with_ref_protection(mut self, protection: Arc<dyn RefProtection>) -> Self {
        self.ref_protection = protection;
        self
    }

    /// Whether the command's ref is protected
    ///
    /// Evaluated on first call and fixed for the rest of the attempt.
    pub fn protected_ref(&self) -> bool {
        *self
            .protected_ref
            .get_or_init(|| self.ref_protection.is_protected(&self.attributes.ref_name))
    }

    /// Give up the command, keeping the pipeline
    pub fn into_pipeline(self) -> Pipeline {
        self.pipeline
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("attributes", &self.attributes)
            .field("stage_seeds", &self.stage_seeds)
            .field("seeds_block", &self.seeds_block.is_some())
            .field("pipeline", &self.pipeline.id)
            .finish()
    }
}
