//! Create step
//!
//! Saves a populated pipeline. Store failures are fatal and propagate.

use async_trait::async_trait;
use std::sync::Arc;

use super::ChainLink;
use crate::collaborators::PipelineStore;
use crate::command::Command;
use crate::error::Result;

pub struct Create {
    store: Arc<dyn PipelineStore>,
}

impl Create {
    pub fn new(store: Arc<dyn PipelineStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChainLink for Create {
    fn name(&self) -> &'static str {
        "create"
    }

    async fn perform(&self, command: &mut Command) -> Result<()> {
        self.store.save(&mut command.pipeline).await?;
        Ok(())
    }

    fn should_break(&self, _command: &Command) -> bool {
        false
    }
}
