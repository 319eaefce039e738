use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::core::app::{api_routes, with_http_layers, AppServices};
use crate::core::config::{SessionConfig, StorageConfig};
use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileMeta, FileRecord, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::features::users::models::{NewUser, User};
use crate::features::users::repositories::UserRepository;
use crate::modules::blob;

pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: "test-session-secret-with-at-least-32-chars".to_string(),
        ttl: Duration::from_secs(3600),
        cookie_name: "zipflow_session".to_string(),
        cookie_secure: false,
    }
}

pub fn sample_user(name: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// File metadata owned by a random user, uploaded just now
pub fn sample_meta(name: &str, mime_type: &str, size: i64) -> FileMeta {
    FileMeta {
        id: Uuid::now_v7(),
        name: name.to_string(),
        size,
        mime_type: mime_type.to_string(),
        user_id: Uuid::now_v7(),
        is_favorite: false,
        created_at: Utc::now(),
    }
}

/// A stored file whose recorded size does not need to match its content
pub fn sample_file(user_id: Uuid, name: &str, mime_type: &str, size: i64) -> FileRecord {
    let mut meta = sample_meta(name, mime_type, size);
    meta.user_id = user_id;
    FileRecord {
        meta,
        content: blob::encode(name.as_bytes()),
    }
}

// ============================================================================
// In-memory repositories
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let mut user = sample_user(&new_user.name, &new_user.email);
        user.password_hash = new_user.password_hash;
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = email.as_deref() {
            if users.iter().any(|u| u.email == email && u.id != id) {
                return Err(AppError::Conflict("Email is already registered".to_string()));
            }
        }

        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            if let Some(name) = name {
                user.name = name;
            }
            if let Some(email) = email {
                user.email = email;
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryFileRepository {
    files: Mutex<Vec<FileRecord>>,
}

impl InMemoryFileRepository {
    /// Store a record as-is, keeping its id and timestamps
    pub fn seed(&self, record: FileRecord) {
        self.files.lock().unwrap().push(record);
    }

    /// Newest first; later inserts win ties
    fn owned_by(&self, user_id: Uuid) -> Vec<FileRecord> {
        let files = self.files.lock().unwrap();
        let mut owned: Vec<FileRecord> = files
            .iter()
            .rev()
            .filter(|f| f.meta.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.meta.created_at.cmp(&a.meta.created_at));
        owned
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn insert(&self, new_file: NewFile) -> Result<FileRecord> {
        let record = FileRecord {
            meta: FileMeta {
                id: Uuid::now_v7(),
                name: new_file.name,
                size: new_file.size,
                mime_type: new_file.mime_type,
                user_id: new_file.user_id,
                is_favorite: false,
                created_at: Utc::now(),
            },
            content: new_file.content,
        };
        self.seed(record.clone());
        Ok(record)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<FileRecord>> {
        Ok(self.owned_by(user_id))
    }

    async fn list_meta_by_owner(&self, user_id: Uuid) -> Result<Vec<FileMeta>> {
        Ok(self.owned_by(user_id).into_iter().map(|f| f.meta).collect())
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<FileRecord>> {
        let files = self.files.lock().unwrap();
        Ok(files
            .iter()
            .find(|f| f.meta.id == id && f.meta.user_id == user_id)
            .cloned())
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| !(f.meta.id == id && f.meta.user_id == user_id));
        Ok(files.len() < before)
    }

    async fn toggle_favorite(&self, id: Uuid, user_id: Uuid) -> Result<Option<bool>> {
        let mut files = self.files.lock().unwrap();
        Ok(files
            .iter_mut()
            .find(|f| f.meta.id == id && f.meta.user_id == user_id)
            .map(|f| {
                f.meta.is_favorite = !f.meta.is_favorite;
                f.meta.is_favorite
            }))
    }

    async fn total_size(&self, user_id: Uuid) -> Result<i64> {
        let files = self.files.lock().unwrap();
        Ok(files
            .iter()
            .filter(|f| f.meta.user_id == user_id)
            .map(|f| f.meta.size)
            .sum())
    }
}

// ============================================================================
// Router harness
// ============================================================================

/// Full API router over in-memory repositories
pub struct TestApp {
    pub server: TestServer,
    pub files: Arc<InMemoryFileRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage(StorageConfig::default())
    }

    pub fn with_storage(storage: StorageConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let services = AppServices::new(
            users,
            Arc::clone(&files) as Arc<dyn FileRepository>,
            &test_session_config(),
            &storage,
        );
        let app = with_http_layers(api_routes(services), vec!["*".to_string()]);

        Self {
            server: TestServer::new(app).unwrap(),
            files,
        }
    }

    /// Register a fresh user and log in, returning the session token and user id
    pub async fn signed_in_user(&self) -> (String, Uuid) {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        // Fake emails can repeat across calls; prefix keeps them unique
        let email = format!("{}-{}", Uuid::now_v7().simple(), email);

        self.server
            .post("/api/register")
            .json(&json!({ "name": name, "email": email, "password": "password123" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let body: Value = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": "password123" }))
            .await
            .json();

        let token = body["data"]["access_token"].as_str().unwrap().to_string();
        let user_id = body["data"]["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, user_id)
    }
}
