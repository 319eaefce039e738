use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, SessionClaims};
use crate::features::users::models::User;

/// A freshly signed session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates signed session tokens (HS256 JWT).
///
/// The same token is accepted from an `Authorization: Bearer` header or from
/// the session cookie set at login.
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
    cookie_name: String,
    cookie_secure: bool,
}

impl SessionService {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_secs: i64::try_from(config.ttl.as_secs()).unwrap_or(i64::MAX),
            cookie_name: config.cookie_name.clone(),
            cookie_secure: config.cookie_secure,
        }
    }

    /// Sign a session for the given user
    pub fn issue(&self, user: &User) -> Result<IssuedSession> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("Session TTL out of range: {}s", self.ttl_secs))
            })?;

        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

        Ok(IssuedSession {
            token,
            expires_in: self.ttl_secs,
            expires_at,
        })
    }

    /// Validate a session token and return the user it belongs to
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                AppError::Unauthorized("Invalid or expired session".to_string())
            })?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid session subject".to_string()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Unauthorized("Invalid session expiry".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            name: claims.name,
            email: claims.email,
            expires_at,
        })
    }

    /// Pull the session token from the request, Bearer header first, cookie second
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Result<Option<String>> {
        if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
            let value = auth_header.to_str().map_err(|_| {
                AppError::Unauthorized("Invalid authorization header format".to_string())
            })?;

            return match value.strip_prefix("Bearer ") {
                Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
                _ => Err(AppError::Unauthorized(
                    "Invalid authorization header format".to_string(),
                )),
            };
        }

        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(token)
    }

    /// `Set-Cookie` value carrying a session token
    pub fn session_cookie(&self, session: &IssuedSession) -> String {
        self.cookie(&session.token, session.expires_in)
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, value, max_age
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_user, test_session_config};
    use axum::http::HeaderValue;

    #[test]
    fn test_issue_then_validate() {
        let service = SessionService::new(&test_session_config());
        let user = sample_user("Sari", "sari@example.com");

        let session = service.issue(&user).unwrap();
        let authenticated = service.validate(&session.token).unwrap();

        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.email, "sari@example.com");
        assert_eq!(authenticated.name, "Sari");
        assert_eq!(authenticated.expires_at.timestamp(), session.expires_at.timestamp());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let service = SessionService::new(&test_session_config());
        let mut other_config = test_session_config();
        other_config.secret = "another-secret-that-is-long-enough-xyz".to_string();
        let other = SessionService::new(&other_config);

        let session = other.issue(&sample_user("A", "a@example.com")).unwrap();

        assert!(matches!(
            service.validate(&session.token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_session_config();
        let service = SessionService::new(&config);
        let past = Utc::now() - Duration::hours(2);
        let claims = SessionClaims {
            sub: Uuid::now_v7().to_string(),
            email: "old@example.com".to_string(),
            name: "Old".to_string(),
            iat: (past - Duration::hours(1)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let mut config = test_session_config();
        config.ttl = std::time::Duration::from_secs(u64::MAX);
        let service = SessionService::new(&config);

        assert!(matches!(
            service.issue(&sample_user("A", "a@example.com")),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let service = SessionService::new(&test_session_config());
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));

        assert_eq!(
            service.token_from_headers(&headers).unwrap().as_deref(),
            Some("abc.def")
        );
    }

    #[test]
    fn test_non_bearer_header_is_rejected() {
        let service = SessionService::new(&test_session_config());
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));

        assert!(service.token_from_headers(&headers).is_err());
    }

    #[test]
    fn test_token_from_cookie() {
        let service = SessionService::new(&test_session_config());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; zipflow_session=tok123; lang=id"),
        );

        assert_eq!(
            service.token_from_headers(&headers).unwrap().as_deref(),
            Some("tok123")
        );
    }

    #[test]
    fn test_missing_token() {
        let service = SessionService::new(&test_session_config());
        assert!(service
            .token_from_headers(&HeaderMap::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let mut config = test_session_config();
        config.cookie_secure = true;
        let service = SessionService::new(&config);

        let cleared = service.clear_cookie();
        assert!(cleared.starts_with("zipflow_session=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert!(cleared.contains("HttpOnly"));
        assert!(cleared.ends_with("; Secure"));
    }
}
