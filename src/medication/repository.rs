//! Medication repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{CreateMedicationRequest, Medication, MedicationListQuery};

/// Repository for medication database operations.
#[derive(Debug, Clone)]
pub struct MedicationRepository {
    pool: SqlitePool,
}

impl MedicationRepository {
    /// Create a new medication repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new medication ID.
    fn generate_id() -> String {
        format!("med_{}", nanoid::nanoid!(12))
    }

    /// Insert a medication record.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: &CreateMedicationRequest,
        registration_number: &str,
        created_by: &str,
    ) -> Result<Medication> {
        let id = Self::generate_id();

        debug!("Creating medication: {} ({})", request.name, id);

        sqlx::query(
            r#"
            INSERT INTO medications (
                id, name, registration_number, batch_number, manufacturer,
                dosage, expiration_date, storage_location, created_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&request.name)
        .bind(registration_number)
        .bind(&request.batch_number)
        .bind(&request.manufacturer)
        .bind(&request.dosage)
        .bind(&request.expiration_date)
        .bind(&request.storage_location)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .context("Failed to insert medication")?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Medication not found after creation"))
    }

    /// Get a medication by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Medication>> {
        let medication = sqlx::query_as::<_, Medication>(
            r#"
            SELECT id, name, registration_number, batch_number, manufacturer,
                   dosage, expiration_date, storage_location, created_by,
                   created_at, updated_at
            FROM medications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch medication")?;

        Ok(medication)
    }

    /// List medications, newest first, with an optional search filter.
    ///
    /// The search matches name or registration number, case-insensitively.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &MedicationListQuery) -> Result<Vec<Medication>> {
        let limit = query.limit.unwrap_or(100);
        let offset = query.offset.unwrap_or(0);

        let mut sql = String::from(
            r#"
            SELECT id, name, registration_number, batch_number, manufacturer,
                   dosage, expiration_date, storage_location, created_by,
                   created_at, updated_at
            FROM medications
            WHERE 1=1
            "#,
        );

        let mut bind_values: Vec<String> = Vec::new();

        if let Some(search) = &query.search {
            sql.push_str(" AND (name LIKE ? OR registration_number LIKE ?)");
            let pattern = format!("%{}%", search);
            bind_values.push(pattern.clone());
            bind_values.push(pattern);
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut query_builder = sqlx::query_as::<_, Medication>(&sql);
        for value in &bind_values {
            query_builder = query_builder.bind(value);
        }
        query_builder = query_builder.bind(limit).bind(offset);

        let medications = query_builder
            .fetch_all(&self.pool)
            .await
            .context("Failed to list medications")?;

        Ok(medications)
    }

    /// Count total medications.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM medications")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count medications")?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::db::Database;
    use crate::user::UserRepository;

    async fn setup() -> (Database, MedicationRepository, String) {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());
        let user = users
            .create("op@example.com", "Op", "hash", Role::Operator)
            .await
            .unwrap();
        let repo = MedicationRepository::new(db.pool().clone());
        (db, repo, user.id)
    }

    fn request(name: &str) -> CreateMedicationRequest {
        CreateMedicationRequest {
            name: name.to_string(),
            batch_number: Some("B-1".to_string()),
            manufacturer: None,
            dosage: None,
            expiration_date: None,
            storage_location: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_db, repo, user_id) = setup().await;

        let med = repo
            .create(&request("Ibuprofen"), "VTR-2025-000000001", &user_id)
            .await
            .unwrap();
        assert_eq!(med.name, "Ibuprofen");
        assert_eq!(med.registration_number, "VTR-2025-000000001");
        assert_eq!(med.created_by.as_deref(), Some(user_id.as_str()));

        let fetched = repo.get(&med.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, med.id);

        assert!(repo.get("med_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_number_conflicts() {
        let (_db, repo, user_id) = setup().await;

        repo.create(&request("First"), "VTR-2025-000000002", &user_id)
            .await
            .unwrap();
        let err = repo
            .create(&request("Second"), "VTR-2025-000000002", &user_id)
            .await
            .unwrap_err();

        let is_unique = err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<sqlx::Error>(),
                Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
            )
        });
        assert!(is_unique);
    }

    #[tokio::test]
    async fn test_unknown_creator_is_fk_violation() {
        let (_db, repo, _user_id) = setup().await;

        let err = repo
            .create(&request("Orphan"), "VTR-2025-000000003", "usr_missing")
            .await
            .unwrap_err();

        let is_fk = err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<sqlx::Error>(),
                Some(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation()
            )
        });
        assert!(is_fk);
    }

    #[tokio::test]
    async fn test_list_search_case_insensitive() {
        let (_db, repo, user_id) = setup().await;

        repo.create(&request("Amoxicillin"), "VTR-2025-000000010", &user_id)
            .await
            .unwrap();
        repo.create(&request("Paracetamol"), "VTR-2025-000000011", &user_id)
            .await
            .unwrap();

        let all = repo.list(&MedicationListQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let hits = repo
            .list(&MedicationListQuery {
                search: Some("amoxi".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Amoxicillin");

        // Registration numbers are searchable too
        let by_number = repo
            .list(&MedicationListQuery {
                search: Some("000000011".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_number.len(), 1);
        assert_eq!(by_number[0].name, "Paracetamol");
    }
}
