//! Pipeline validation
//!
//! The chain only triggers validation and inspects the returned errors; the
//! rules themselves belong to the validator.

use anvil_core::domain::Pipeline;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The validation engine itself failed
#[derive(Debug, Error)]
#[error("pipeline validation failed to run: {0}")]
pub struct ValidatorError(pub String);

/// Validates a populated pipeline
#[async_trait]
pub trait PipelineValidator: Send + Sync {
    /// Returns every violation found; an empty list means valid
    async fn validate(&self, pipeline: &Pipeline) -> Result<Vec<ValidationError>, ValidatorError>;
}

/// Accepts every pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl PipelineValidator for AcceptAll {
    async fn validate(&self, _pipeline: &Pipeline) -> Result<Vec<ValidationError>, ValidatorError> {
        Ok(Vec::new())
    }
}

/// Structural checks on the stage and job graph
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

#[async_trait]
impl PipelineValidator for StructuralValidator {
    async fn validate(&self, pipeline: &Pipeline) -> Result<Vec<ValidationError>, ValidatorError> {
        Ok(check_structure(pipeline))
    }
}

fn check_structure(pipeline: &Pipeline) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut previous: Option<u32> = None;

    for stage in &pipeline.stages {
        if stage.name.trim().is_empty() {
            errors.push(ValidationError::new(format!(
                "Stage at position {} has no name",
                stage.position
            )));
        }

        match previous {
            Some(prev) if stage.position <= prev => {
                errors.push(ValidationError::new(format!(
                    "Stage '{}' position {} must be greater than {}",
                    stage.name, stage.position, prev
                )));
            }
            _ => {}
        }
        previous = Some(stage.position);

        if stage.jobs.is_empty() {
            errors.push(ValidationError::new(format!(
                "Stage '{}' has no jobs",
                stage.name
            )));
        }

        for job in &stage.jobs {
            if job.name.trim().is_empty() {
                errors.push(ValidationError::new(format!(
                    "Stage '{}' has a job without a name",
                    stage.name
                )));
            } else if job.script.iter().all(|line| line.trim().is_empty()) {
                errors.push(ValidationError::new(format!(
                    "Job '{}' has no script",
                    job.name
                )));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_core::domain::{JobSeed, ProjectId, StageSeed};
    use anvil_core::dto::pipeline::CreatePipeline;

    fn pipeline_with(seeds: &[StageSeed]) -> Pipeline {
        let mut pipeline = Pipeline::new(ProjectId(1), &CreatePipeline::new("main", "abc"));
        pipeline.stages = seeds.iter().map(StageSeed::to_resource).collect();
        pipeline
    }

    fn job(name: &str) -> JobSeed {
        JobSeed::new(name, vec!["true".to_string()])
    }

    #[tokio::test]
    async fn test_valid_pipeline() {
        let pipeline = pipeline_with(&[
            StageSeed::new("build", 0, vec![job("compile")]),
            StageSeed::new("test", 1, vec![job("unit"), job("lint")]),
        ]);

        let errors = StructuralValidator.validate(&pipeline).await.unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[tokio::test]
    async fn test_duplicate_stage_names_are_allowed() {
        let pipeline = pipeline_with(&[
            StageSeed::new("test", 0, vec![job("a")]),
            StageSeed::new("test", 1, vec![job("b")]),
        ]);

        assert!(StructuralValidator.validate(&pipeline).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_positions_must_increase() {
        let pipeline = pipeline_with(&[
            StageSeed::new("build", 1, vec![job("compile")]),
            StageSeed::new("test", 1, vec![job("unit")]),
        ]);

        let errors = StructuralValidator.validate(&pipeline).await.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("position 1 must be greater than 1"));
    }

    #[tokio::test]
    async fn test_empty_stage_and_missing_script() {
        let pipeline = pipeline_with(&[
            StageSeed::new("build", 0, vec![]),
            StageSeed::new("test", 1, vec![JobSeed::new("unit", vec![])]),
        ]);

        let errors = StructuralValidator.validate(&pipeline).await.unwrap();
        let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec!["Stage 'build' has no jobs", "Job 'unit' has no script"]
        );
    }

    #[tokio::test]
    async fn test_accept_all() {
        let pipeline = pipeline_with(&[StageSeed::new("", 3, vec![])]);
        assert!(AcceptAll.validate(&pipeline).await.unwrap().is_empty());
    }
}
