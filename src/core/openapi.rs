use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::content::ContentKind;
use crate::features::violations::{dtos as violations_dtos, handlers as violations_handlers};
use crate::features::violations::models::{ViolationReason, ViolationStatus};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Violations
        violations_handlers::create_violation,
        violations_handlers::process_violation,
        violations_handlers::list_violations,
        violations_handlers::list_pending_violations,
        violations_handlers::list_my_violations,
        violations_handlers::get_violation,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Violations
            ContentKind,
            ViolationStatus,
            ViolationReason,
            violations_dtos::CreateViolationDto,
            violations_dtos::ProcessViolationDto,
            violations_dtos::CleanupOutcome,
            violations_dtos::ViolationResponseDto,
            violations_dtos::ProcessViolationResponseDto,
            ApiResponse<violations_dtos::ViolationResponseDto>,
            ApiResponse<violations_dtos::ProcessViolationResponseDto>,
            ApiResponse<Vec<violations_dtos::ViolationResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Caller identity"),
        (name = "violations", description = "Reporting and adjudication of board posts and chat rooms"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Socialboard API",
        version = "0.1.0",
        description = "API documentation for Socialboard moderation",
    )
)]
pub struct ApiDoc;

/// Adds the Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_violation_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/violation"));
        assert!(doc.paths.paths.contains_key("/api/violation/{id}/process"));
        assert!(doc.paths.paths.contains_key("/api/auth/me"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging build".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.description.as_deref(), Some("staging build"));
    }
}
