//! Pipeline persistence
//!
//! Saving happens after a successful construction; the chain never rolls a
//! saved pipeline back.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use anvil_core::domain::{Pipeline, ProjectId};

/// Errors raised by a pipeline store
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The pipeline has no internal id yet
    #[error("pipeline {0} has no internal id")]
    MissingIid(uuid::Uuid),

    /// Another pipeline already holds the key
    #[error("pipeline #{iid} already exists in project {project}")]
    Duplicate { project: ProjectId, iid: u64 },

    /// Backend failure
    #[error("pipeline store unavailable: {0}")]
    Unavailable(String),
}

/// Persists constructed pipelines
#[async_trait]
pub trait PipelineStore: Send + Sync {
    /// Save the pipeline and mark it persisted
    async fn save(&self, pipeline: &mut Pipeline) -> Result<(), StoreError>;
}

/// Keeps saved pipelines in memory keyed by project and iid
#[derive(Debug, Default)]
pub struct InMemoryPipelineStore {
    pipelines: Mutex<HashMap<(ProjectId, u64), Pipeline>>,
}

impl InMemoryPipelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a saved pipeline
    pub fn find(&self, project: ProjectId, iid: u64) -> Option<Pipeline> {
        self.pipelines.lock().ok()?.get(&(project, iid)).cloned()
    }

    /// Number of saved pipelines
    pub fn len(&self) -> usize {
        self.pipelines.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PipelineStore for InMemoryPipelineStore {
    async fn save(&self, pipeline: &mut Pipeline) -> Result<(), StoreError> {
        let iid = pipeline.iid.ok_or(StoreError::MissingIid(pipeline.id))?;
        let key = (pipeline.project_id, iid);

        let mut pipelines = self
            .pipelines
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if pipelines.contains_key(&key) {
            return Err(StoreError::Duplicate {
                project: pipeline.project_id,
                iid,
            });
        }

        pipeline.mark_persisted();
        pipelines.insert(key, pipeline.clone());

        tracing::debug!(
            "Pipeline saved: #{} in project {} ({})",
            iid,
            pipeline.project_id,
            pipeline.id
        );

        Ok(())
    }
}
