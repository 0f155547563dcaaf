//! Seed file loading
//!
//! Stage seeds come from either a JSON array of stages or a Lua definition
//! evaluated in a sandbox without io, os or package access:
//!
//! ```lua
//! return {
//!     stages = {
//!         { name = "build", jobs = { { name = "compile", script = "make" } } },
//!         { name = "test", position = 5, jobs = {
//!             { name = "unit", script = { "make test" } },
//!             { name = "deploy", script = "./deploy.sh", rules = { { if_ref = "main", when = "manual" } } },
//!         } },
//!     }
//! }
//! ```
//!
//! A stage without `position` follows the previous stage (the first one gets 0).
//! Every job needs a non-empty `script`.

use anyhow::{Context, Result};
use mlua::{Lua, LuaOptions, StdLib, Table, Value};
use std::path::Path;

use anvil_core::domain::{JobSeed, Rule, StageSeed, When};

/// Load seeds from a file, picking the format by extension
pub fn load_seeds(path: &Path) -> Result<Vec<StageSeed>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("lua") => parse_lua_seeds(&source),
        _ => parse_json_seeds(&source),
    }
}

/// Parse a JSON array of stage seeds
pub fn parse_json_seeds(source: &str) -> Result<Vec<StageSeed>> {
    serde_json::from_str(source).context("Seed file must be a JSON array of stages")
}

/// Parse stage seeds from a Lua definition
pub fn parse_lua_seeds(source: &str) -> Result<Vec<StageSeed>> {
    let lua = create_sandbox().context("Failed to create Lua sandbox")?;

    let definition: Table = lua
        .load(source)
        .eval()
        .context("Failed to evaluate seed definition")?;

    let stages: Table = definition
        .get("stages")
        .context("Seed definition must have a 'stages' field")?;

    let mut seeds: Vec<StageSeed> = Vec::new();
    for pair in stages.sequence_values::<Table>() {
        let stage = pair.context("Failed to read stage entry")?;
        let previous = seeds.last().map(|s| s.position);
        seeds.push(parse_stage(&stage, previous)?);
    }

    Ok(seeds)
}

fn create_sandbox() -> mlua::Result<Lua> {
    let lua = Lua::new_with(
        StdLib::TABLE | StdLib::STRING | StdLib::MATH,
        LuaOptions::default(),
    )?;

    lua.globals().set("require", mlua::Nil)?;
    lua.globals().set("dofile", mlua::Nil)?;
    lua.globals().set("loadfile", mlua::Nil)?;

    Ok(lua)
}

fn parse_stage(stage: &Table, previous: Option<u32>) -> Result<StageSeed> {
    let name: String = stage
        .get("name")
        .context("Stage must have a 'name' field")?;

    let position: Option<u32> = stage
        .get("position")
        .with_context(|| format!("Stage '{}' position must be a non-negative integer", name))?;
    let position = match position {
        Some(position) => position,
        None => match previous {
            Some(previous) => previous
                .checked_add(1)
                .with_context(|| format!("Stage '{}' position overflows", name))?,
            None => 0,
        },
    };

    let jobs = match stage.get::<Value>("jobs")? {
        Value::Nil => Vec::new(),
        Value::Table(table) => {
            let mut jobs = Vec::new();
            for pair in table.sequence_values::<Table>() {
                let job = pair.with_context(|| format!("Failed to read job in stage '{}'", name))?;
                jobs.push(parse_job(&job)?);
            }
            jobs
        }
        _ => anyhow::bail!("Stage '{}' jobs must be an array", name),
    };

    Ok(StageSeed::new(name, position, jobs))
}

fn parse_job(job: &Table) -> Result<JobSeed> {
    let name: String = job.get("name").context("Job must have a 'name' field")?;

    let script = match job.get::<Value>("script")? {
        Value::Nil => anyhow::bail!("Job '{}' must have a 'script' field", name),
        Value::String(line) => vec![line.to_str()?.to_string()],
        Value::Table(lines) => lines
            .sequence_values::<String>()
            .collect::<mlua::Result<Vec<_>>>()
            .with_context(|| format!("Job '{}' script must be an array of strings", name))?,
        _ => anyhow::bail!("Job '{}' script must be a string or an array", name),
    };

    if script.iter().all(|line| line.trim().is_empty()) {
        anyhow::bail!("Job '{}' script cannot be empty", name);
    }

    let mut seed = JobSeed::new(name, script);

    if let Value::Table(rules) = job.get::<Value>("rules")? {
        for pair in rules.sequence_values::<Table>() {
            let rule = pair.with_context(|| format!("Failed to read rule of job '{}'", seed.name))?;
            let if_ref: Option<String> = rule.get("if_ref")?;
            let when = match rule.get::<Option<String>>("when")? {
                Some(when) => when.parse::<When>().map_err(anyhow::Error::msg)?,
                None => When::default(),
            };
            seed = seed.with_rule(Rule { if_ref, when });
        }
    }

    Ok(seed)
}
