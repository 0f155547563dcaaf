//! Seed types
//!
//! Seeds are pre-validated descriptions of the stages and jobs a pipeline
//! should contain. They are read-only; `StageSeed::to_resource` turns one into
//! a `Stage` ready to be attached to a pipeline.

use serde::{Deserialize, Serialize};

use super::job::{Job, When};
use super::stage::Stage;

/// Inclusion rule attached to a job seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_ref: Option<String>,
    #[serde(default)]
    pub when: When,
}

/// Descriptor of one job inside a stage seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSeed {
    pub name: String,
    pub script: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl JobSeed {
    pub fn new(name: impl Into<String>, script: Vec<String>) -> Self {
        Self {
            name: name.into(),
            script,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// `when` of the first rule, `OnSuccess` without rules
    pub fn when(&self) -> When {
        self.rules.first().map(|r| r.when).unwrap_or_default()
    }

    fn to_resource(&self, stage: &str) -> Job {
        Job {
            name: self.name.clone(),
            stage: stage.to_string(),
            script: self.script.clone(),
            when: self.when(),
        }
    }
}

/// Descriptor of one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSeed {
    pub name: String,
    pub position: u32,
    #[serde(default)]
    pub jobs: Vec<JobSeed>,
}

impl StageSeed {
    pub fn new(name: impl Into<String>, position: u32, jobs: Vec<JobSeed>) -> Self {
        Self {
            name: name.into(),
            position,
            jobs,
        }
    }

    /// Materialize the seed into a stage with its jobs, in seed order
    pub fn to_resource(&self) -> Stage {
        Stage {
            name: self.name.clone(),
            position: self.position,
            jobs: self.jobs.iter().map(|j| j.to_resource(&self.name)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_resource_preserves_order_and_position() {
        let seed = StageSeed::new(
            "test",
            1,
            vec![
                JobSeed::new("unit", vec!["cargo test".to_string()]),
                JobSeed::new("lint", vec!["cargo clippy".to_string()]),
            ],
        );

        let stage = seed.to_resource();
        assert_eq!(stage.name, "test");
        assert_eq!(stage.position, 1);
        assert_eq!(stage.jobs.len(), 2);
        assert_eq!(stage.jobs[0].name, "unit");
        assert_eq!(stage.jobs[1].name, "lint");
        assert!(stage.jobs.iter().all(|j| j.stage == "test"));
    }

    #[test]
    fn test_to_resource_is_deterministic() {
        let seed = StageSeed::new("build", 0, vec![JobSeed::new("compile", vec![])]);
        assert_eq!(seed.to_resource(), seed.to_resource());
    }

    #[test]
    fn test_job_when_from_first_rule() {
        let job = JobSeed::new("deploy", vec!["./deploy.sh".to_string()])
            .with_rule(Rule {
                if_ref: Some("main".to_string()),
                when: When::Manual,
            })
            .with_rule(Rule {
                if_ref: None,
                when: When::Always,
            });
        assert_eq!(job.when(), When::Manual);
        assert_eq!(JobSeed::new("plain", vec![]).when(), When::OnSuccess);
    }

    #[test]
    fn test_deserialize_seed_defaults() {
        let json = r#"{ "name": "build", "position": 0, "jobs": [ { "name": "compile", "script": ["make"] } ] }"#;
        let seed: StageSeed = serde_json::from_str(json).unwrap();
        assert!(seed.jobs[0].rules.is_empty());
        assert_eq!(seed.jobs[0].when(), When::OnSuccess);
    }

    #[test]
    fn test_deserialize_requires_script() {
        let json = r#"{ "name": "build", "position": 0, "jobs": [ { "name": "compile" } ] }"#;
        let err = serde_json::from_str::<StageSeed>(json).unwrap_err();
        assert!(err.to_string().contains("script"));
    }
}
