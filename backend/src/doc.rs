//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the shared
//! schemas, and the session cookie security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::character::{
    AuthorizationFlags, CharacterSummary, CharacterView, UpdateCharacterFields,
};
use crate::domain::error::{Error, ErrorCode};
use crate::inbound::http::characters::{PrivacyRequest, UpdateCharacterRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Cookie session carrying the requester's email",
            ))),
        );
    }
}

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::characters::random_characters,
        crate::inbound::http::characters::characters_of_the_day,
        crate::inbound::http::characters::list_characters,
        crate::inbound::http::characters::read_character,
        crate::inbound::http::characters::update_character,
        crate::inbound::http::characters::set_privacy,
        crate::inbound::http::characters::remove_privacy,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CharacterView,
        CharacterSummary,
        AuthorizationFlags,
        UpdateCharacterFields,
        UpdateCharacterRequest,
        PrivacyRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "characters", description = "Character aggregation, privacy, and sampling"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;
