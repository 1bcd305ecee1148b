use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const USER_TAG: &str = "Users";
pub const SESSION_TAG: &str = "Sessions";
pub const MEETUP_TAG: &str = "Meetups";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meetapp",
        description = "REST API for users, sessions and meetups",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(crate::api::dto::ErrorResponse)
    ),
    tags(
        (name = USER_TAG, description = "Signup and profile endpoints"),
        (name = SESSION_TAG, description = "Login and token refresh endpoints"),
        (name = MEETUP_TAG, description = "Meetup endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token from POST /api/sessions"))
                        .build(),
                ),
            )
        }
    }
}
