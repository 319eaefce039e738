use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateProfileDto, UserProfileResponseDto};
use crate::features::users::models::normalize_email;
use crate::features::users::repositories::UserRepository;

/// Service for reading and editing the signed-in user's profile
pub struct UserProfileService {
    users: Arc<dyn UserRepository>,
}

impl UserProfileService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Get current user's profile
    pub async fn get_profile(&self, user: &AuthenticatedUser) -> Result<UserProfileResponseDto> {
        let record = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(record.into())
    }

    /// Update name and/or email
    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<UserProfileResponseDto> {
        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let email = dto.email.as_deref().map(normalize_email);

        if let Some(email) = email.as_deref() {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != user.user_id {
                    return Err(AppError::Conflict(
                        "Email is already registered".to_string(),
                    ));
                }
            }
        }

        let updated = self
            .users
            .update_profile(user.user_id, name, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("Profile updated: user_id={}", updated.id);

        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::{NewUser, User};
    use crate::shared::test_helpers::InMemoryUserRepository;
    use chrono::{Duration, Utc};

    async fn seed(users: &InMemoryUserRepository, name: &str, email: &str) -> User {
        users
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn signed_in(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn update(name: Option<&str>, email: Option<&str>) -> UpdateProfileDto {
        UpdateProfileDto {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_email_taken_by_other_user_conflicts() {
        let users = Arc::new(InMemoryUserRepository::default());
        let budi = seed(&users, "Budi", "budi@example.com").await;
        seed(&users, "Sinta", "sinta@example.com").await;
        let service = UserProfileService::new(users);

        let result = service
            .update_profile(&signed_in(&budi), update(None, Some(" SINTA@Example.com ")))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_keeping_own_email_succeeds() {
        let users = Arc::new(InMemoryUserRepository::default());
        let budi = seed(&users, "Budi", "budi@example.com").await;
        let service = UserProfileService::new(users);

        let profile = service
            .update_profile(&signed_in(&budi), update(Some("Budi S"), Some("Budi@Example.com")))
            .await
            .unwrap();

        assert_eq!(profile.name, "Budi S");
        assert_eq!(profile.email, "budi@example.com");
    }

    #[tokio::test]
    async fn test_new_email_is_normalized() {
        let users = Arc::new(InMemoryUserRepository::default());
        let budi = seed(&users, "Budi", "budi@example.com").await;
        let service = UserProfileService::new(users);

        let profile = service
            .update_profile(&signed_in(&budi), update(None, Some("  Budi.New@Example.COM ")))
            .await
            .unwrap();

        assert_eq!(profile.email, "budi.new@example.com");
        assert_eq!(profile.name, "Budi");
    }

    #[tokio::test]
    async fn test_blank_name_is_ignored() {
        let users = Arc::new(InMemoryUserRepository::default());
        let budi = seed(&users, "Budi", "budi@example.com").await;
        let service = UserProfileService::new(users);

        let profile = service
            .update_profile(&signed_in(&budi), update(Some("   "), None))
            .await
            .unwrap();

        assert_eq!(profile.name, "Budi");
        assert_eq!(profile.email, "budi@example.com");
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let service = UserProfileService::new(Arc::new(InMemoryUserRepository::default()));
        let ghost = crate::shared::test_helpers::sample_user("Ghost", "ghost@example.com");

        let result = service.get_profile(&signed_in(&ghost)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
