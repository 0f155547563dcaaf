//! Pipeline DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::pipeline::PipelineSource;

/// Raw attributes of a pipeline creation request
///
/// Opaque to the construction chain apart from the ref and sha checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePipeline {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    #[serde(default)]
    pub source: PipelineSource,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl CreatePipeline {
    pub fn new(ref_name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            ref_name: ref_name.into(),
            sha: sha.into(),
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: PipelineSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}
