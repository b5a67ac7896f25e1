//! CLI command implementations.

pub mod artifact;
pub mod init;
pub mod plan;
pub mod platform;
pub mod validate;
