//! Stage domain types

use serde::{Deserialize, Serialize};

use super::job::Job;

/// An ordered group of jobs within a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    /// Ordering index, unique within one pipeline
    pub position: u32,
    pub jobs: Vec<Job>,
}
