//! Application services: content access, page generation and rendering.

pub mod content;
pub mod error;
pub mod pages;
pub mod render;
