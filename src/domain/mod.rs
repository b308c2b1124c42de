//! Core domain models for gomodcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Go module versions with semantic-version ordering
//! - Dependency records read from go.mod
//! - Per-dependency check results and the resolution map
//! - Summary counts and update kinds

mod check_result;
mod dependency;
mod summary;
mod version;

pub use check_result::{CheckResult, ResolutionMap};
pub use dependency::DependencyRecord;
pub use summary::{CheckSummary, VersionChangeType};
pub use version::{ParseVersionError, Version};
