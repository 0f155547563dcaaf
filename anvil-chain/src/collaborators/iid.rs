//! IID allocation
//!
//! Internal ids are sequential per project. The allocator is the one resource
//! shared between concurrent construction attempts, so implementations must
//! hand out unique, strictly increasing values under concurrent callers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use anvil_core::domain::ProjectId;

/// Errors raised by an IID allocator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// No ids left for the project
    #[error("internal id sequence exhausted for project {0}")]
    Exhausted(ProjectId),

    /// The allocator could not be reached or locked in time
    #[error("internal id allocator unavailable: {0}")]
    Unavailable(String),
}

/// Allocates project-scoped sequential ids
#[async_trait]
pub trait IidAllocator: Send + Sync {
    /// Reserve the next id for `project`
    ///
    /// A reserved id is never handed out again, even when the pipeline that
    /// requested it fails to build.
    async fn next_iid(&self, project: ProjectId) -> Result<u64, AllocationError>;
}

/// Process-local allocator backed by per-project counters
#[derive(Debug)]
pub struct InMemoryIidAllocator {
    counters: Mutex<HashMap<ProjectId, u64>>,
    start: u64,
    ceiling: Option<u64>,
}

impl InMemoryIidAllocator {
    /// Creates an allocator whose first id for every project is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an allocator whose first id for every project is `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            start,
            ceiling: None,
        }
    }

    /// Caps the ids handed out per project
    pub fn with_ceiling(mut self, ceiling: u64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Last id handed out for `project`, if any
    pub fn last_iid(&self, project: ProjectId) -> Option<u64> {
        self.counters.lock().ok()?.get(&project).copied()
    }
}

impl Default for InMemoryIidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IidAllocator for InMemoryIidAllocator {
    async fn next_iid(&self, project: ProjectId) -> Result<u64, AllocationError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|e| AllocationError::Unavailable(e.to_string()))?;

        let next = match counters.get(&project) {
            Some(last) => last
                .checked_add(1)
                .ok_or(AllocationError::Exhausted(project))?,
            None => self.start,
        };

        if self.ceiling.is_some_and(|ceiling| next > ceiling) {
            return Err(AllocationError::Exhausted(project));
        }

        counters.insert(project, next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sequential_per_project() {
        let allocator = InMemoryIidAllocator::new();

        assert_eq!(allocator.next_iid(ProjectId(1)).await, Ok(1));
        assert_eq!(allocator.next_iid(ProjectId(1)).await, Ok(2));
        assert_eq!(allocator.next_iid(ProjectId(2)).await, Ok(1));
        assert_eq!(allocator.last_iid(ProjectId(1)), Some(2));
        assert_eq!(allocator.last_iid(ProjectId(3)), None);
    }

    #[tokio::test]
    async fn test_starting_at() {
        let allocator = InMemoryIidAllocator::starting_at(100);
        assert_eq!(allocator.next_iid(ProjectId(1)).await, Ok(100));
        assert_eq!(allocator.next_iid(ProjectId(1)).await, Ok(101));
    }

    #[tokio::test]
    async fn test_ceiling_exhausts() {
        let allocator = InMemoryIidAllocator::new().with_ceiling(2);

        assert_eq!(allocator.next_iid(ProjectId(4)).await, Ok(1));
        assert_eq!(allocator.next_iid(ProjectId(4)).await, Ok(2));
        assert_eq!(
            allocator.next_iid(ProjectId(4)).await,
            Err(AllocationError::Exhausted(ProjectId(4)))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_get_unique_ids() {
        let allocator = Arc::new(InMemoryIidAllocator::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                tokio::spawn(async move { allocator.next_iid(ProjectId(9)).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let id = handle.await.unwrap().unwrap();
            assert!(ids.insert(id), "id {} handed out twice", id);
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(allocator.last_iid(ProjectId(9)), Some(64));
    }
}
