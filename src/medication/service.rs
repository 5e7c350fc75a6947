//! Medication service for business logic.

use anyhow::Result;
use tracing::{info, instrument};

use super::models::{CreateMedicationRequest, Medication, MedicationListQuery};
use super::qr::{self, QrCode};
use super::registration;
use super::repository::MedicationRepository;

/// Service for medication registration and lookup.
#[derive(Debug, Clone)]
pub struct MedicationService {
    repo: MedicationRepository,
    public_base_url: String,
}

impl MedicationService {
    /// Create a new medication service.
    pub fn new(repo: MedicationRepository, public_base_url: String) -> Self {
        Self {
            repo,
            public_base_url,
        }
    }

    /// Register a medication and build its QR code material.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn register(
        &self,
        request: &CreateMedicationRequest,
        created_by: &str,
    ) -> Result<(Medication, QrCode)> {
        let registration_number = registration::generate();

        let medication = self
            .repo
            .create(request, &registration_number, created_by)
            .await?;

        info!(
            medication_id = %medication.id,
            registration_number = %medication.registration_number,
            "Registered medication"
        );

        let qr = qr::build(&medication, &self.public_base_url)?;
        Ok((medication, qr))
    }

    /// Get a medication by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Medication>> {
        self.repo.get(id).await
    }

    /// Get a medication together with its QR code material.
    #[instrument(skip(self))]
    pub async fn get_with_qr(&self, id: &str) -> Result<Option<(Medication, QrCode)>> {
        let Some(medication) = self.repo.get(id).await? else {
            return Ok(None);
        };
        let qr = qr::build(&medication, &self.public_base_url)?;
        Ok(Some((medication, qr)))
    }

    /// List medications, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &MedicationListQuery) -> Result<Vec<Medication>> {
        self.repo.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::db::Database;
    use crate::user::UserRepository;

    async fn setup() -> (Database, MedicationService, String) {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());
        let user = users
            .create("op@example.com", "Op", "hash", Role::Operator)
            .await
            .unwrap();
        let service = MedicationService::new(
            MedicationRepository::new(db.pool().clone()),
            "http://localhost:3001".to_string(),
        );
        (db, service, user.id)
    }

    #[tokio::test]
    async fn test_register_assigns_number_and_qr() {
        let (_db, service, user_id) = setup().await;

        let request = CreateMedicationRequest {
            name: "Amoxicillin".to_string(),
            dosage: Some("500mg".to_string()),
            ..Default::default()
        };

        let (medication, qr) = service.register(&request, &user_id).await.unwrap();

        assert!(medication.registration_number.starts_with("VTR-"));
        assert!(
            qr.verification_url
                .ends_with(&format!("/verify/{}", medication.id))
        );

        let (again, qr_again) = service.get_with_qr(&medication.id).await.unwrap().unwrap();
        assert_eq!(again.id, medication.id);
        assert_eq!(qr_again.data, qr.data);
    }

    #[tokio::test]
    async fn test_get_with_qr_missing() {
        let (_db, service, _user_id) = setup().await;
        assert!(service.get_with_qr("med_missing").await.unwrap().is_none());
    }
}
