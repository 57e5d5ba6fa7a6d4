//! Domain model for project pages.

pub mod error;
pub mod project;
