//! Image-extraction service client module.
//!
//! Provides an async client for the external service that reads drug
//! label photos and returns structured fields.

mod client;
mod error;
mod types;

pub use client::ExtractorClient;
pub use error::{ExtractorError, ExtractorResult};
pub use types::{ExtractedDrugInfo, ExtractionResponse};
