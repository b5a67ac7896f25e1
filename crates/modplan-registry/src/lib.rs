//! Module descriptor resolution for native engine plugins.
//!
//! Turns static module declarations into an ordered build plan that a host
//! build orchestrator consumes: include directories, link dependencies, and
//! the prebuilt SDK library to link for the chosen platform.
//!
//! # Architecture
//!
//! - **Path Composer** ([`path`]): lazily joins a root and relative segments
//! - **Module Descriptor** ([`descriptor`]): one immutable record per module,
//!   built with [`ModuleDescriptorBuilder`]
//! - **Descriptor Registry** ([`registry`]): validates references and orders
//!   modules so dependencies precede dependents
//! - **Build Plan** ([`plan`]): the fully resolved output for one platform
//!
//! Declarations normally come from a `modplan.toml` ([`manifest`]).

pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod path;
pub mod plan;
pub mod registry;
pub mod tree;

// Re-exports for convenience.
pub use descriptor::{
    ModuleDescriptor, ModuleDescriptorBuilder, ModuleKind, PchUsage, PrivateContract,
    PublicContract, SdkLink,
};
pub use error::{RegistryError, Result};
pub use manifest::{PluginManifest, MANIFEST_FILE};
pub use path::{compose, PathAnchor, PathRoots, PathSpec};
pub use plan::{build_plan, BuildPlan, ModulePlan};
pub use registry::{DescriptorRegistry, ENGINE_MODULES};
pub use tree::{format_plan, format_tree};

pub use modplan_targets::{ArtifactTable, TargetError, TargetPlatform};
