//! Application state shared across handlers.

use crate::audit::AuditRecorder;
use crate::auth::AuthState;
use crate::extractor::ExtractorClient;
use crate::medication::MedicationService;
use crate::user::UserService;

/// Application state shared across all handlers.
///
/// Every field is cheaply cloneable; the services share the one
/// connection pool underneath.
#[derive(Clone)]
pub struct AppState {
    /// Authentication state (token issue/verify, origin allowlist).
    pub auth: AuthState,
    /// User service for accounts and credentials.
    pub users: UserService,
    /// Medication registry service.
    pub medications: MedicationService,
    /// Image-extraction service client.
    pub extractor: ExtractorClient,
    /// Audit trail recorder.
    pub audit: AuditRecorder,
    /// Redact non-operational error messages in responses.
    pub production_mode: bool,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        auth: AuthState,
        users: UserService,
        medications: MedicationService,
        extractor: ExtractorClient,
        audit: AuditRecorder,
    ) -> Self {
        let production_mode = auth.production_mode();

        Self {
            auth,
            users,
            medications,
            extractor,
            audit,
            production_mode,
        }
    }
}
