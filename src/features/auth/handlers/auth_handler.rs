use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, LogoutResponseDto, RegisterRequestDto,
    SessionResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthUserDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthUserDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(user),
            Some("User registered successfully".to_string()),
            None,
        )),
    ))
}

/// Login with email and password
///
/// Returns the session token in the body and also sets it as an HttpOnly cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<impl IntoResponse> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service.login(dto).await?;
    Ok((
        [(header::SET_COOKIE, outcome.cookie)],
        Json(ApiResponse::success(Some(outcome.response), None, None)),
    ))
}

/// End the browser session by clearing the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = ApiResponse<LogoutResponseDto>)
    ),
    tag = "auth"
)]
pub async fn logout(State(service): State<Arc<AuthService>>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, service.logout_cookie())],
        Json(ApiResponse::success(
            Some(LogoutResponseDto { logged_out: true }),
            None,
            None,
        )),
    )
}

/// Get the current session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("session" = [])
    )
)]
pub async fn get_session(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    let session = service.current_session(user).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}
