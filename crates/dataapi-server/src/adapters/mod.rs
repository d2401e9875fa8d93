//! Adapters for the Data API.
//!
//! Collaborator implementations that satisfy the outbound ports.

pub mod memory;

pub use memory::{InMemoryBlobMetadataStore, InMemoryOperatorHandler, OperatorRecord};
