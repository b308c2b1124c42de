//! gomodcheck - Go module version resolution library
//!
//! This library provides the core functionality for checking the modules
//! required by a go.mod against a Go module proxy:
//! - Parsing go.mod and looking up published versions concurrently
//! - Ignore policy and pluggable selection strategies
//! - Rewriting pins to the selected versions

pub mod cancel;
pub mod checker;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod output;
pub mod policy;
pub mod progress;
pub mod registry;
