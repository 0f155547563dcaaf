//! Error types for pipeline construction
//!
//! Business-rule failures ("no stages", "failed to build") are not errors at
//! this level: they are recorded on the pipeline and halt the chain. Everything
//! in [`ChainError`] is fatal and propagates to the caller unchanged.

use thiserror::Error;
use uuid::Uuid;

use crate::collaborators::{AllocationError, StoreError, ValidatorError};

/// Result type alias for chain operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Fatal errors raised while constructing a pipeline
#[derive(Debug, Error)]
pub enum ChainError {
    /// Construction was started on a pipeline that is already saved
    #[error("pipeline {pipeline_id} is already persisted and cannot be populated again")]
    AlreadyPersisted {
        /// Primary key of the offending pipeline
        pipeline_id: Uuid,
    },

    /// The IID allocator could not hand out an id
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The validation engine failed to run
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// The pipeline store failed to save
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChainError {
    /// Check if this error reports a second construction attempt
    pub fn is_already_persisted(&self) -> bool {
        matches!(self, Self::AlreadyPersisted { .. })
    }
}
