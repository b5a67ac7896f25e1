//! Target platform identifiers and prebuilt SDK artifact tables.
//!
//! A module that links a native SDK declares one static library file name
//! per target platform. This crate owns that mapping:
//! - **Platform:** the closed set of build targets (Linux, Mac, Win64)
//! - **Artifact Table:** platform → library file name, at most one entry each
//! - **Validation:** non-fatal checks on library naming conventions

pub mod artifact;
pub mod error;
pub mod platform;
pub mod validate;

pub use artifact::{ArtifactTable, PlatformArtifactEntry};
pub use error::{Result, TargetError};
pub use platform::TargetPlatform;
pub use validate::{validate_artifacts, Severity, ValidationIssue};
