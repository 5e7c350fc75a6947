//! Medication registry: models, persistence, registration numbers, QR material.

pub mod models;
pub mod qr;
pub mod registration;
pub mod repository;
pub mod service;

pub use models::{CreateMedicationRequest, Medication, MedicationListQuery};
pub use qr::QrCode;
pub use repository::MedicationRepository;
pub use service::MedicationService;
