//! Repository validation step
//!
//! Rejects requests that do not name a ref and a commit before any id is
//! allocated for them.

use async_trait::async_trait;

use super::ChainLink;
use crate::command::Command;
use crate::error::Result;

pub const REFERENCE_NOT_FOUND: &str = "Reference not found";
pub const COMMIT_NOT_FOUND: &str = "Commit not found";

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateRepository;

#[async_trait]
impl ChainLink for ValidateRepository {
    fn name(&self) -> &'static str {
        "validate_repository"
    }

    async fn perform(&self, command: &mut Command) -> Result<()> {
        if command.attributes.ref_name.trim().is_empty() {
            command.pipeline.add_error(REFERENCE_NOT_FOUND);
            return Ok(());
        }

        if command.attributes.sha.trim().is_empty() {
            command.pipeline.add_error(COMMIT_NOT_FOUND);
        }

        Ok(())
    }

    fn should_break(&self, command: &Command) -> bool {
        command.pipeline.has_errors()
    }
}
