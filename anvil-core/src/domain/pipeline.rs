//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::stage::Stage;
use crate::dto::pipeline::CreatePipeline;

/// Project scope for internal ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What triggered the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineSource {
    #[default]
    Push,
    Web,
    Api,
    Schedule,
    Trigger,
}

impl std::str::FromStr for PipelineSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "push" => Ok(Self::Push),
            "web" => Ok(Self::Web),
            "api" => Ok(Self::Api),
            "schedule" => Ok(Self::Schedule),
            "trigger" => Ok(Self::Trigger),
            other => Err(format!("unknown pipeline source '{}'", other)),
        }
    }
}

/// Pipeline aggregate under construction
///
/// Created empty by the caller, filled in by the construction chain and
/// marked persisted by the store once saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub project_id: ProjectId,
    /// Project-scoped sequential id, `None` until allocated
    pub iid: Option<u64>,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub source: PipelineSource,
    pub variables: HashMap<String, String>,
    pub protected: bool,
    pub stages: Vec<Stage>,
    pub errors: Vec<String>,
    persisted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Pipeline {
    /// Build an empty, non-persisted pipeline from request attributes
    pub fn new(project_id: ProjectId, attributes: &CreatePipeline) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            iid: None,
            ref_name: attributes.ref_name.clone(),
            sha: attributes.sha.clone(),
            source: attributes.source,
            variables: attributes.variables.clone(),
            protected: false,
            stages: Vec::new(),
            errors: Vec::new(),
            persisted: false,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Flag the pipeline as committed to storage
    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn job_count(&self) -> usize {
        self.stages.iter().map(|s| s.jobs.len()).sum()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }
}
