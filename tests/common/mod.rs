//! Test utilities and common setup.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use serde_json::Value;

use veritrace::api;
use veritrace::audit::AuditRecorder;
use veritrace::auth::{AuthConfig, AuthState, Role};
use veritrace::db::Database;
use veritrace::extractor::ExtractorClient;
use veritrace::medication::{MedicationRepository, MedicationService};
use veritrace::user::{User, UserRepository, UserService};

/// Signing secret shared by all integration tests.
pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Public base URL used in QR verification links.
pub const TEST_BASE_URL: &str = "http://localhost:3000";

/// Nothing listens here, so extraction requests fail fast.
pub const UNREACHABLE_EXTRACTOR: &str = "http://127.0.0.1:9";

/// Everything a test needs to drive the API and arrange fixtures.
pub struct TestContext {
    pub app: Router,
    pub auth: AuthState,
    pub users: UserService,
    pub audit: AuditRecorder,
}

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Some(TEST_SECRET.to_string()),
        ..AuthConfig::default()
    }
}

async fn build_app(auth_config: AuthConfig) -> TestContext {
    // Use in-memory database for tests
    let db = Database::in_memory().await.unwrap();
    let pool = db.pool().clone();

    let auth = AuthState::new(auth_config);
    let users = UserService::new(UserRepository::new(pool.clone()));
    let medications = MedicationService::new(
        MedicationRepository::new(pool.clone()),
        TEST_BASE_URL.to_string(),
    );
    let extractor = ExtractorClient::new(UNREACHABLE_EXTRACTOR);
    let audit = AuditRecorder::new(pool);

    let state = api::AppState::new(
        auth.clone(),
        users.clone(),
        medications,
        extractor,
        audit.clone(),
    );

    TestContext {
        app: api::create_router(state),
        auth,
        users,
        audit,
    }
}

/// Test application with an explicit auth configuration.
pub async fn test_app_with(config: AuthConfig) -> TestContext {
    build_app(config).await
}

/// Test application in development mode with a JWT secret configured.
pub async fn test_app() -> TestContext {
    build_app(test_auth_config()).await
}

/// Test application in production mode (internal errors redacted).
pub async fn test_app_production() -> TestContext {
    let config = AuthConfig {
        production_mode: true,
        ..test_auth_config()
    };
    build_app(config).await
}

impl TestContext {
    /// Insert an account and return it.
    pub async fn seed_user(&self, email: &str, name: &str, password: &str, role: Role) -> User {
        self.users
            .upsert_user(email, name, password, role)
            .await
            .unwrap()
    }

    /// Insert the admin fixture and mint a token for it.
    pub async fn admin(&self) -> (User, String) {
        let user = self
            .seed_user(
                "admin@veritrace.dev",
                "System Administrator",
                "admin-password",
                Role::Admin,
            )
            .await;
        let token = self.token_for(&user);
        (user, token)
    }

    /// Insert the operator fixture and mint a token for it.
    pub async fn operator(&self) -> (User, String) {
        let user = self
            .seed_user(
                "operator@veritrace.dev",
                "Warehouse Operator",
                "operator-password",
                Role::Operator,
            )
            .await;
        let token = self.token_for(&user);
        (user, token)
    }

    /// Mint a token for an existing account.
    pub fn token_for(&self, user: &User) -> String {
        self.auth
            .issue_token(&user.id, &user.email, &user.name, user.role)
            .unwrap()
    }
}

/// Build a GET request, optionally authenticated.
pub fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path).method(Method::GET);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a JSON POST request, optionally authenticated.
pub fn post_json(path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(path)
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Build a multipart POST with a single file part.
pub fn post_multipart(
    path: &str,
    token: Option<&str>,
    part_name: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{part_name}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .uri(path)
        .method(Method::POST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
