use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::files::{
    dtos as files_dtos, handlers as files_handlers, models as files_models,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler};
use crate::shared::types::{ApiResponse, ErrorResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_session,
        // Users
        profile_handler::get_profile,
        profile_handler::update_profile,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::download_file,
        files_handlers::delete_file,
        files_handlers::toggle_favorite,
        // Dashboard
        dashboard_handlers::get_storage,
        dashboard_handlers::get_summary,
        dashboard_handlers::get_cleanup,
        dashboard_handlers::export_data,
    ),
    components(
        schemas(
            // Shared
            Meta,
            ErrorResponse,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::SessionResponseDto,
            auth::dtos::LogoutResponseDto,
            ApiResponse<auth::dtos::AuthUserDto>,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::SessionResponseDto>,
            ApiResponse<auth::dtos::LogoutResponseDto>,
            // Users
            users_dtos::UpdateProfileDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            // Files
            files_models::FileCategory,
            files_models::FileCollection,
            files_dtos::UploadFileDto,
            files_dtos::FileItemDto,
            ApiResponse<files_dtos::FileItemDto>,
            ApiResponse<Vec<files_dtos::FileItemDto>>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            ApiResponse<files_dtos::FavoriteResponseDto>,
            // Dashboard
            dashboard_dtos::StorageStatus,
            dashboard_dtos::CategoryUsageDto,
            dashboard_dtos::ExportDto,
            ApiResponse<dashboard_dtos::StorageUsageDto>,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
            ApiResponse<dashboard_dtos::CleanupSuggestionsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "users", description = "User profile management"),
        (name = "files", description = "File upload, browsing and management"),
        (name = "dashboard", description = "Storage usage, summary, cleanup and export"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "ZipFlow API",
        version = "0.1.0",
        description = "API documentation for ZipFlow personal cloud storage",
    )
)]
pub struct ApiDoc;

/// Adds the session security schemes (Bearer token or session cookie)
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("zipflow_session"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct OpenApiInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for OpenApiInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
