//! Version selection policy
//!
//! This module provides:
//! - The ignore policy built from `ignored_modules`
//! - Pluggable selection strategies choosing which available version counts as the update

mod filter;
mod strategy;

pub use filter::IgnorePolicy;
pub use strategy::{SelectionStrategy, Strategy};
