use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, RegisterRequestDto, SessionResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::session_service::SessionService;
use crate::features::users::models::{normalize_email, NewUser};
use crate::features::users::repositories::UserRepository;

/// Result of a successful login: the response body plus the cookie to set
pub struct LoginOutcome {
    pub response: AuthResponseDto,
    pub cookie: String,
}

/// Service for authentication operations (register, login, session)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<SessionService>) -> Self {
        Self { users, sessions }
    }

    /// Register a new user
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthUserDto> {
        let email = normalize_email(&dto.email);
        let name = dto.name.trim().to_string();

        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password = dto.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        // A concurrent registration can still win the race; the unique index
        // turns that into a Conflict inside the repository.
        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        tracing::info!("User registered: id={}", user.id);

        Ok(user.into())
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginOutcome> {
        let email = normalize_email(&dto.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login rejected: unknown email");
                return Err(invalid_credentials());
            }
        };

        let password = dto.password;
        let stored_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    AppError::Internal(format!("Password verification task failed: {}", e))
                })??;

        if !verified {
            tracing::debug!("Login rejected: wrong password for user_id={}", user.id);
            return Err(invalid_credentials());
        }

        let session = self.sessions.issue(&user)?;
        let cookie = self.sessions.session_cookie(&session);

        tracing::info!("User logged in: id={}", user.id);

        Ok(LoginOutcome {
            response: AuthResponseDto {
                access_token: session.token,
                token_type: "Bearer".to_string(),
                expires_in: session.expires_in,
                user: user.into(),
            },
            cookie,
        })
    }

    /// Cookie value that ends the browser session
    pub fn logout_cookie(&self) -> String {
        self.sessions.clear_cookie()
    }

    /// Current session info, read from the stored user so profile edits show up
    pub async fn current_session(&self, user: AuthenticatedUser) -> Result<SessionResponseDto> {
        let record = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session user no longer exists".to_string()))?;

        Ok(SessionResponseDto {
            user: record.into(),
            expires_at: user.expires_at,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_session_config, InMemoryUserRepository};

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(SessionService::new(&test_session_config())),
        )
    }

    fn register_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            name: "Dewi".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = service();
        let user = service
            .register(register_dto("  Dewi@Example.com "))
            .await
            .unwrap();

        assert_eq!(user.email, "dewi@example.com");
        assert_eq!(user.name, "Dewi");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service.register(register_dto("dewi@example.com")).await.unwrap();

        let result = service.register(register_dto("DEWI@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_session() {
        let service = service();
        service.register(register_dto("dewi@example.com")).await.unwrap();

        let outcome = service
            .login(LoginRequestDto {
                email: "dewi@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.response.token_type, "Bearer");
        assert!(!outcome.response.access_token.is_empty());
        assert!(outcome.cookie.contains(&outcome.response.access_token));
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let service = service();
        service.register(register_dto("dewi@example.com")).await.unwrap();

        let result = service
            .login(LoginRequestDto {
                email: "dewi@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_current_session_reads_stored_user() {
        let users = Arc::new(InMemoryUserRepository::default());
        let service = AuthService::new(
            Arc::clone(&users) as Arc<dyn UserRepository>,
            Arc::new(SessionService::new(&test_session_config())),
        );
        let registered = service.register(register_dto("dewi@example.com")).await.unwrap();
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(1);

        users
            .update_profile(
                registered.id,
                Some("Dewi Lestari".to_string()),
                Some("lestari@example.com".to_string()),
            )
            .await
            .unwrap();

        let session = service
            .current_session(AuthenticatedUser {
                user_id: registered.id,
                name: "Dewi".to_string(),
                email: "dewi@example.com".to_string(),
                expires_at,
            })
            .await
            .unwrap();

        assert_eq!(session.user.name, "Dewi Lestari");
        assert_eq!(session.user.email, "lestari@example.com");
        assert_eq!(session.expires_at, expires_at);
    }

    #[tokio::test]
    async fn test_current_session_for_missing_user_is_unauthorized() {
        let result = service()
            .current_session(AuthenticatedUser {
                user_id: uuid::Uuid::now_v7(),
                name: "Ghost".to_string(),
                email: "ghost@example.com".to_string(),
                expires_at: chrono::Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_fails() {
        let result = service()
            .login(LoginRequestDto {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
