//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};

use droply::config::DeletionConfig;
use droply::web::handlers::AppState;
use droply::web::middleware::{JwtClaims, JwtState};
use droply::web::router::create_router;
use droply::{Database, MemoryObjectStore, NewNode, Node, NodeRepository};

/// Secret shared by the test server and the test tokens.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Sign a token for `sub` valid for one hour.
pub fn token_for(sub: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: sub.to_string(),
        iat: now as u64,
        exp: (now + 3600) as u64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// `Authorization` header value for `sub`.
pub fn bearer(sub: &str) -> String {
    format!("Bearer {}", token_for(sub))
}

/// Handles to a test server's backing stores.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<Database>,
    pub objects: Arc<MemoryObjectStore>,
}

impl TestApp {
    pub fn repo(&self) -> NodeRepository<'_> {
        NodeRepository::new(self.db.pool())
    }
}

/// Create a test server with an in-memory database and object store.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(DeletionConfig::default()).await
}

/// Create a test server with custom deletion settings.
pub async fn create_test_app_with(deletion: DeletionConfig) -> TestApp {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let objects = Arc::new(MemoryObjectStore::new());

    let app_state = Arc::new(
        AppState::new(db.clone(), objects.clone()).with_deletion_config(deletion),
    );
    let jwt_state = Arc::new(JwtState::new(TEST_SECRET));
    let router = create_router(app_state, jwt_state, &[]);

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        objects,
    }
}

/// Create a file owned by `owner`, registering its remote object when given.
pub async fn add_file(
    repo: &NodeRepository<'_>,
    objects: &MemoryObjectStore,
    owner: &str,
    parent: Option<&Node>,
    name: &str,
    remote_id: Option<&str>,
) -> Node {
    let mut new = NewNode::file(owner, name, format!("/droply/{owner}/{name}"), "https://cdn/x");
    if let Some(remote_id) = remote_id {
        new = new.with_remote_object(remote_id);
        objects.insert(remote_id);
    }
    if let Some(parent) = parent {
        new = new.with_parent(&parent.id);
    }
    repo.create(&new).await.expect("Failed to create file")
}

/// Create a folder owned by `owner`.
pub async fn add_folder(
    repo: &NodeRepository<'_>,
    owner: &str,
    parent: Option<&Node>,
    name: &str,
) -> Node {
    let mut new = NewNode::folder(owner, name, format!("/droply/{owner}/{name}"));
    if let Some(parent) = parent {
        new = new.with_parent(&parent.id);
    }
    repo.create(&new).await.expect("Failed to create folder")
}
