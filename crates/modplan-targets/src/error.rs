//! Error types for platform and artifact operations.

use crate::platform::TargetPlatform;

/// Errors that can occur while resolving platform artifacts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// The module links an SDK but has no artifact for this platform.
    #[error("module '{module}' has no native artifact for platform {platform}")]
    UnsupportedPlatform {
        /// Module that was being resolved.
        module: String,
        /// The requested platform.
        platform: TargetPlatform,
    },

    /// A second artifact was registered for a platform that already has one.
    #[error("module '{module}' registers more than one artifact for platform {platform}")]
    DuplicateArtifactRegistration {
        /// Module owning the artifact table.
        module: String,
        /// The platform registered twice.
        platform: TargetPlatform,
    },

    /// An artifact was registered with an empty file name.
    #[error("module '{module}' registers an empty artifact name for platform {platform}")]
    EmptyArtifactName {
        /// Module owning the artifact table.
        module: String,
        /// The platform with the empty entry.
        platform: TargetPlatform,
    },

    /// A platform identifier did not match any known platform.
    #[error("unknown platform '{name}' (expected one of: Linux, Mac, Win64)")]
    UnknownPlatform {
        /// The identifier as written.
        name: String,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
