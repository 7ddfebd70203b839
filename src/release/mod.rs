//! Release pipeline: metadata derivation, per-target builds, artifact push,
//! and registry pointer updates
//!
//! The pipeline is a deterministic forward sequence with no rollback. Each
//! stage is a separate invocation so an operator can verify pushed artifacts
//! before advertising them as latest.

pub mod builder;
pub mod metadata;
pub mod pusher;
pub mod registry;

pub use builder::{Artifact, Builder};
pub use metadata::BuildMetadata;
pub use pusher::{ArtifactPusher, PushReport};
pub use registry::RegistryUpdater;
