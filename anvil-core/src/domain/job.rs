//! Job domain types

use serde::{Deserialize, Serialize};

/// Job record belonging to a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    /// Name of the owning stage
    pub stage: String,
    pub script: Vec<String>,
    pub when: When,
}

/// When a job becomes runnable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum When {
    #[default]
    OnSuccess,
    Manual,
    Always,
    Delayed,
}

impl std::str::FromStr for When {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_success" => Ok(Self::OnSuccess),
            "manual" => Ok(Self::Manual),
            "always" => Ok(Self::Always),
            "delayed" => Ok(Self::Delayed),
            other => Err(format!("unknown job condition '{}'", other)),
        }
    }
}
