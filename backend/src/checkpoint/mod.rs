//! Checkpoint - per-particle restart files
//!
//! Load and write the record a production run leaves behind for a particle
//! that needs to be replayed in isolation.
//!
//! # Critical Invariants
//!
//! - **Wholesale loading**: a record exists only if every field was valid
//! - **Scoped handles**: files are closed on every exit path
//! - **Stable identity**: the digest of a record does not depend on member order

pub mod format;
pub mod loader;
pub mod record;
pub mod writer;

pub use format::FormatError;
pub use loader::load_checkpoint;
pub use record::{compute_document_digest, CheckpointRecord};
pub use writer::{checkpoint_file_name, write_checkpoint};
