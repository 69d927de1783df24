//! Core domain models for shroud
//!
//! This crate contains:
//! - Sensitive-data categories and their redaction markers
//! - Per-run counts, options and injected host capabilities
//! - The run summary and its builder

pub mod capabilities;
pub mod category;
pub mod error;
pub mod summary;

pub use capabilities::{HostCapabilities, RunOptions};
pub use category::{RedactionCounts, SensitiveCategory, Token};
pub use error::{CoreError, Result};
pub use summary::{BannerPlacement, RunSummary, SummaryBuilder};
