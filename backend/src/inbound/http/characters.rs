//! Character API handlers.
//!
//! ```text
//! GET    /api/v1/characters/random?n=3
//! GET    /api/v1/characters/of-the-day
//! GET    /api/v1/characters?email=a@x.com
//! GET    /api/v1/characters/{name}
//! PUT    /api/v1/characters/{name} {"showPublic":false}
//! PUT    /api/v1/characters/{name}/privacy {"privacy":"race"}
//! DELETE /api/v1/characters/{name}/privacy {"privacy":"race"}
//! ```

use actix_web::{delete, get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::character::{
    CharacterFilter, CharacterName, CharacterSummary, CharacterValidationError, CharacterView,
    UpdateCharacterFields,
};
use crate::domain::privacy::{PrivacyField, PrivacyValidationError};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Register character routes on a scope.
///
/// Literal segments (`random`, `of-the-day`) must be registered before the
/// `{name}` capture or the capture shadows them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(random_characters)
        .service(characters_of_the_day)
        .service(list_characters)
        .service(read_character)
        .service(update_character)
        .service(set_privacy)
        .service(remove_privacy);
}

/// Filter accepted by the character list endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Restrict to characters owned by this email.
    pub email: Option<String>,
    /// Restrict to characters owned by this alias.
    pub alias: Option<String>,
}

/// Sample-size parameter for the random endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RandomQuery {
    /// Requested sample size; clamped server-side.
    pub n: Option<usize>,
}

/// Authorization-flag payload for `PUT /characters/{name}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterRequest {
    /// New public-sampling eligibility, when present.
    pub show_public: Option<bool>,
    /// New guild visibility, when present.
    pub show_guild: Option<bool>,
}

/// Privacy payload for the privacy endpoints.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PrivacyRequest {
    /// Profile field name to hide from (or reveal to) non-owners.
    pub privacy: String,
}

fn parse_name(raw: &str) -> Result<CharacterName, Error> {
    CharacterName::new(raw).map_err(map_name_error)
}

fn map_name_error(err: CharacterValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
}

fn map_privacy_error(err: PrivacyValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "privacy" }))
}

/// Requester identity for this request; empty string means anonymous.
fn requester_email(session: &SessionContext) -> Result<String, Error> {
    Ok(session.requester_email()?.unwrap_or_default())
}

/// Random sample of public character names.
#[utoipa::path(
    get,
    path = "/api/v1/characters/random",
    params(RandomQuery),
    responses(
        (status = 200, description = "Sampled character names", body = [String]),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["characters"],
    operation_id = "randomCharacters",
    security([])
)]
#[get("/characters/random")]
pub async fn random_characters(
    state: web::Data<HttpState>,
    query: web::Query<RandomQuery>,
) -> ApiResult<web::Json<Vec<String>>> {
    let names = state.sampling.random(query.n).await?;
    Ok(web::Json(names))
}

/// The current "characters of the day" selection.
#[utoipa::path(
    get,
    path = "/api/v1/characters/of-the-day",
    responses(
        (status = 200, description = "Characters of the day", body = [String]),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["characters"],
    operation_id = "charactersOfTheDay",
    security([])
)]
#[get("/characters/of-the-day")]
pub async fn characters_of_the_day(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<String>>> {
    let names = state.sampling.characters_of_the_day().await?;
    Ok(web::Json(names))
}

/// List character summaries, optionally filtered by owner.
#[utoipa::path(
    get,
    path = "/api/v1/characters",
    params(ListQuery),
    responses(
        (status = 200, description = "Character summaries", body = [CharacterSummary]),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["characters"],
    operation_id = "listCharacters",
    security([])
)]
#[get("/characters")]
pub async fn list_characters(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<CharacterSummary>>> {
    let ListQuery { email, alias } = query.into_inner();
    let filter = CharacterFilter { email, alias };
    let summaries = state.characters.list(&filter).await?;
    Ok(web::Json(summaries))
}

/// Aggregated, privacy-redacted view of one character.
///
/// Anonymous requesters and non-owners get the snapshot minus the owner's
/// privacy selection; the owner sees everything. A failing upstream
/// profile fetch degrades the response instead of failing it.
#[utoipa::path(
    get,
    path = "/api/v1/characters/{name}",
    params(("name" = String, Path, description = "Character name")),
    responses(
        (status = 200, description = "Aggregated character view", body = CharacterView),
        (status = 400, description = "Invalid character name", body = Error),
        (status = 404, description = "Character not found", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["characters"],
    operation_id = "readCharacter",
    security([])
)]
#[get("/characters/{name}")]
pub async fn read_character(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CharacterView>> {
    let name = parse_name(&path.into_inner())?;
    let email = requester_email(&session)?;
    let view = state.characters.read(&name, &email).await?;
    Ok(web::Json(view))
}

/// Update authorization flags on an owned character.
#[utoipa::path(
    put,
    path = "/api/v1/characters/{name}",
    params(("name" = String, Path, description = "Character name")),
    request_body = UpdateCharacterRequest,
    responses(
        (status = 200, description = "Updated authorization flags"),
        (status = 400, description = "Invalid character name", body = Error),
        (status = 403, description = "Requester does not own the character", body = Error)
    ),
    tags = ["characters"],
    operation_id = "updateCharacter"
)]
#[put("/characters/{name}")]
pub async fn update_character(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateCharacterRequest>,
) -> ApiResult<HttpResponse> {
    let name = parse_name(&path.into_inner())?;
    let email = requester_email(&session)?;
    let UpdateCharacterRequest {
        show_public,
        show_guild,
    } = payload.into_inner();
    let fields = UpdateCharacterFields {
        show_public,
        show_guild,
    };
    let record = state.character_commands.update(&email, &name, fields).await?;
    // The record embeds the credential; answer with the public subset only.
    Ok(HttpResponse::Ok().json(json!({
        "name": record.name.as_ref(),
        "authorization": {
            "showPublic": record.show_public,
            "showGuild": record.show_guild,
        },
    })))
}

/// Hide a profile field from non-owners.
#[utoipa::path(
    put,
    path = "/api/v1/characters/{name}/privacy",
    params(("name" = String, Path, description = "Character name")),
    request_body = PrivacyRequest,
    responses(
        (status = 204, description = "Privacy field stored"),
        (status = 400, description = "Invalid name or privacy field", body = Error),
        (status = 403, description = "Requester does not own the character", body = Error)
    ),
    tags = ["characters"],
    operation_id = "setPrivacy"
)]
#[put("/characters/{name}/privacy")]
pub async fn set_privacy(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PrivacyRequest>,
) -> ApiResult<HttpResponse> {
    let name = parse_name(&path.into_inner())?;
    let email = requester_email(&session)?;
    let field = PrivacyField::new(payload.into_inner().privacy).map_err(map_privacy_error)?;
    state
        .character_commands
        .set_privacy(&name, &email, &field)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stop hiding a profile field from non-owners.
#[utoipa::path(
    delete,
    path = "/api/v1/characters/{name}/privacy",
    params(("name" = String, Path, description = "Character name")),
    request_body = PrivacyRequest,
    responses(
        (status = 204, description = "Privacy field removed"),
        (status = 400, description = "Invalid name or privacy field", body = Error),
        (status = 403, description = "Requester does not own the character", body = Error)
    ),
    tags = ["characters"],
    operation_id = "removePrivacy"
)]
#[delete("/characters/{name}/privacy")]
pub async fn remove_privacy(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PrivacyRequest>,
) -> ApiResult<HttpResponse> {
    let name = parse_name(&path.into_inner())?;
    let email = requester_email(&session)?;
    let field = PrivacyField::new(payload.into_inner().privacy).map_err(map_privacy_error)?;
    state
        .character_commands
        .remove_privacy(&name, &email, &field)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
