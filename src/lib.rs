//! Veritrace backend library.
//!
//! Core components of the pharmaceutical traceability backend: the HTTP
//! API, authentication, the medication registry, user accounts, the
//! audit trail, and the image-extraction service client.

pub mod api;
pub mod audit;
pub mod auth;
pub mod db;
pub mod extractor;
pub mod medication;
pub mod user;
