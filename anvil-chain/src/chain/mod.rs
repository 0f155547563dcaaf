//! Construction chain
//!
//! An ordered list of links run against one [`Command`]. After each link the
//! executor asks it whether the chain should stop. A link returning `Err`
//! stops the chain as well, and the error reaches the caller unchanged.

pub mod create;
pub mod populate;
pub mod validate;

pub use create::Create;
pub use populate::{FAILED_TO_BUILD, NO_STAGES, Populate};
pub use validate::{COMMIT_NOT_FOUND, REFERENCE_NOT_FOUND, ValidateRepository};

use async_trait::async_trait;

use crate::command::Command;
use crate::error::Result;

/// A single construction step
#[async_trait]
pub trait ChainLink: Send + Sync {
    /// Step name (for logging)
    fn name(&self) -> &'static str;

    /// Mutate the command and its pipeline
    ///
    /// Business-rule failures are recorded on the pipeline and reported
    /// through `should_break`; only fatal conditions return `Err`.
    async fn perform(&self, command: &mut Command) -> Result<()>;

    /// Whether the chain halts after this step
    fn should_break(&self, command: &Command) -> bool;
}

/// How a chain run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
    /// Every link ran
    Completed,
    /// A link asked the chain to stop
    Halted { link: &'static str },
}

/// Runs links strictly in order
pub struct ChainExecutor {
    links: Vec<Box<dyn ChainLink>>,
}

impl ChainExecutor {
    pub fn new(links: Vec<Box<dyn ChainLink>>) -> Self {
        Self { links }
    }

    /// Link names in execution order
    pub fn link_names(&self) -> Vec<&'static str> {
        self.links.iter().map(|l| l.name()).collect()
    }

    /// Run the chain against `command`
    ///
    /// No retries happen here; the command keeps whatever partial state the
    /// last link left.
    pub async fn run(&self, command: &mut Command) -> Result<ChainStatus> {
        for link in &self.links {
            tracing::debug!("Running chain link: {}", link.name());

            if let Err(e) = link.perform(command).await {
                tracing::error!("Chain link {} failed: {}", link.name(), e);
                return Err(e);
            }

            if link.should_break(command) {
                tracing::warn!(
                    "Chain halted at {}: {}",
                    link.name(),
                    command.pipeline.errors.join("; ")
                );
                return Ok(ChainStatus::Halted { link: link.name() });
            }
        }

        Ok(ChainStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::StoreError;
    use crate::error::ChainError;
    use anvil_core::domain::{Pipeline, ProjectId};
    use anvil_core::dto::pipeline::CreatePipeline;
    use std::sync::{Arc, Mutex};

    /// Records its name when performed, optionally failing or halting
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        halt: bool,
        fail: bool,
    }

    type Log = Arc<Mutex<Vec<&'static str>>>;

    impl Recorder {
        fn link(name: &'static str, log: &Log, halt: bool, fail: bool) -> Box<dyn ChainLink> {
            Box::new(Self {
                name,
                log: Arc::clone(log),
                halt,
                fail,
            })
        }

        fn boxed(name: &'static str, log: &Log) -> Box<dyn ChainLink> {
            Self::link(name, log, false, false)
        }
    }

    #[async_trait]
    impl ChainLink for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn perform(&self, command: &mut Command) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(ChainError::Store(StoreError::Unavailable("down".into())));
            }
            if self.halt {
                command.pipeline.add_error(format!("{} halted", self.name));
            }
            Ok(())
        }

        fn should_break(&self, command: &Command) -> bool {
            command.pipeline.has_errors()
        }
    }

    fn command() -> Command {
        let attrs = CreatePipeline::new("main", "abc");
        let pipeline = Pipeline::new(ProjectId(1), &attrs);
        Command::new(attrs, pipeline)
    }

    #[tokio::test]
    async fn test_runs_links_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let executor = ChainExecutor::new(vec![
            Recorder::boxed("first", &log),
            Recorder::boxed("second", &log),
            Recorder::boxed("third", &log),
        ]);

        let status = executor.run(&mut command()).await.unwrap();

        assert_eq!(status, ChainStatus::Completed);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(executor.link_names(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_stops_at_breaking_link() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let executor = ChainExecutor::new(vec![
            Recorder::boxed("first", &log),
            Recorder::link("second", &log, true, false),
            Recorder::boxed("third", &log),
        ]);

        let mut cmd = command();
        let status = executor.run(&mut cmd).await.unwrap();

        assert_eq!(status, ChainStatus::Halted { link: "second" });
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(cmd.pipeline.errors, vec!["second halted"]);
    }

    #[tokio::test]
    async fn test_propagates_fatal_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let executor = ChainExecutor::new(vec![
            Recorder::link("first", &log, false, true),
            Recorder::boxed("second", &log),
        ]);

        let err = executor.run(&mut command()).await.unwrap_err();

        assert!(matches!(err, ChainError::Store(StoreError::Unavailable(_))));
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_empty_chain_completes() {
        let executor = ChainExecutor::new(Vec::new());
        assert_eq!(
            executor.run(&mut command()).await.unwrap(),
            ChainStatus::Completed
        );
    }
}
