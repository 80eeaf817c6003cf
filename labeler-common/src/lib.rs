//! # Labeler Common Library
//!
//! Shared code for the segment labeler:
//! - Segment models (store rows and presented segments)
//! - Configuration resolution (CLI / env / TOML / defaults)
//! - Logging setup
//! - Common error type

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

pub use error::{Error, Result};
pub use models::{Segment, SegmentRow};
