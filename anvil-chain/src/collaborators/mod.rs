//! Collaborators
//!
//! Services the construction chain consumes but does not own. Each is a trait
//! injected into the chain, with an in-memory implementation for local runs
//! and tests.

pub mod iid;
pub mod protection;
pub mod store;
pub mod validation;

pub use iid::{AllocationError, IidAllocator, InMemoryIidAllocator};
pub use protection::{ProtectedRefs, RefProtection, Unprotected};
pub use store::{InMemoryPipelineStore, PipelineStore, StoreError};
pub use validation::{
    AcceptAll, PipelineValidator, StructuralValidator, ValidationError, ValidatorError,
};
