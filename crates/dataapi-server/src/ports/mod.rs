//! Ports to the collaborators the Data API reads from.

pub mod outbound;

pub use outbound::{BlobMetadataStore, OperatorHandler};
