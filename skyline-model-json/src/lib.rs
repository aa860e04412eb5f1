//! JSON storage for fitted price models.
//!
//! The trainer writes a [`ModelArtifact`]; the dashboard loads it through
//! [`JsonModelLoader`], registered under the `"json"` format.

pub mod artifact;
pub mod loader;

pub use artifact::{
    ArtifactError, ArtifactMetadata, FORMAT_VERSION, ModelArtifact, read_artifact, write_artifact,
};
pub use loader::JsonModelLoader;
