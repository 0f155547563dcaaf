//! Pipeline command handlers

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anvil_chain::collaborators::{
    AcceptAll, InMemoryIidAllocator, InMemoryPipelineStore, PipelineValidator, ProtectedRefs,
    StructuralValidator,
};
use anvil_chain::{PipelineCreator, PipelineOutcome};
use anvil_core::domain::{Pipeline, PipelineSource, ProjectId};
use anvil_core::dto::pipeline::CreatePipeline;

use crate::config::Config;
use crate::seed_file::load_seeds;

/// Arguments of the `create` command
pub struct CreateRequest {
    pub seeds: PathBuf,
    pub ref_name: String,
    pub sha: String,
    pub source: String,
    pub variables: Vec<(String, String)>,
    pub validate: bool,
    pub json: bool,
}

/// Parse a single key=value pair
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Construct a pipeline from a seed file
pub async fn create_pipeline(req: CreateRequest, config: &Config) -> Result<()> {
    let seeds = load_seeds(&req.seeds)?;
    tracing::debug!(
        "Loaded {} stage seed(s) from {}",
        seeds.len(),
        req.seeds.display()
    );

    let source: PipelineSource = req.source.parse().map_err(anyhow::Error::msg)?;
    let mut attributes = CreatePipeline::new(req.ref_name, req.sha).with_source(source);
    for (key, value) in req.variables {
        attributes = attributes.with_variable(key, value);
    }

    let validator: Arc<dyn PipelineValidator> = if req.validate {
        Arc::new(StructuralValidator)
    } else {
        Arc::new(AcceptAll)
    };

    let creator = PipelineCreator::new(
        Arc::new(InMemoryIidAllocator::starting_at(config.iid_start)),
        Arc::new(ProtectedRefs::new(config.protected_refs.clone())),
        validator,
        Arc::new(InMemoryPipelineStore::new()),
    );

    let outcome = creator
        .execute(ProjectId(config.project_id), attributes, seeds, None)
        .await
        .context("Pipeline construction aborted")?;

    if req.json {
        println!("{}", serde_json::to_string_pretty(outcome.pipeline())?);
    }

    match outcome {
        PipelineOutcome::Created(pipeline) => {
            if !req.json {
                println!("{}", "✓ Pipeline created successfully!".green().bold());
                print_pipeline_details(&pipeline);
            }
            Ok(())
        }
        PipelineOutcome::Failed { errors, .. } => {
            if !req.json {
                println!("{}", "✗ Pipeline was not created:".red().bold());
                for error in &errors {
                    println!("  - {}", error.red());
                }
            }
            anyhow::bail!("pipeline not created: {}", errors.join("; "))
        }
    }
}

/// Materialize a seed file and print the resulting stages
pub fn check_seeds(path: &Path) -> Result<()> {
    let seeds = load_seeds(path)?;

    if seeds.is_empty() {
        println!("{}", "No stages / jobs in this seed file.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} stage(s):", seeds.len()).bold());
    for seed in &seeds {
        let stage = seed.to_resource();
        println!(
            "  {} {} {}",
            "▸".cyan(),
            stage.name.bold(),
            format!("(position {})", stage.position).dimmed()
        );
        for job in &stage.jobs {
            println!("    - {} {}", job.name, format!("[{:?}]", job.when).dimmed());
        }
    }

    Ok(())
}

/// Print detailed pipeline information
fn print_pipeline_details(pipeline: &Pipeline) {
    println!("  ID:        {}", pipeline.id.to_string().cyan());
    println!(
        "  IID:       #{}",
        pipeline.iid.map(|i| i.to_string()).unwrap_or_default()
    );
    println!("  Project:   {}", pipeline.project_id);
    println!("  Ref:       {}", pipeline.ref_name.bold());
    println!("  Sha:       {}", pipeline.sha.dimmed());
    println!(
        "  Protected: {}",
        if pipeline.protected {
            "yes".yellow()
        } else {
            "no".normal()
        }
    );
    println!(
        "  Created:   {}",
        pipeline.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    println!("\n{}", "Stages:".bold());
    for stage in &pipeline.stages {
        println!(
            "  {} {} {}",
            "▸".cyan(),
            stage.name.bold(),
            format!("(position {})", stage.position).dimmed()
        );
        for job in &stage.jobs {
            println!("    - {}", job.name);
        }
    }
}
