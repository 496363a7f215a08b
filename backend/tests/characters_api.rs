//! End-to-end HTTP coverage: real domain services over the in-memory
//! record store, with stub profile sources standing in for the external
//! account API.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App, HttpResponse};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use armory_backend::domain::character::{
    ApiCredential, CharacterName, CharacterRecord, GuildRecord, OwnerAccount,
};
use armory_backend::domain::character_service::CharacterService;
use armory_backend::domain::ports::{ProfileSource, ProfileSourceError};
use armory_backend::domain::sampling_cache::{SamplingCache, SamplingConfig};
use armory_backend::domain::snapshot::ProfileSnapshot;
use armory_backend::domain::Error;
use armory_backend::inbound::http::characters;
use armory_backend::inbound::http::session::SessionContext;
use armory_backend::inbound::http::state::HttpState;
use armory_backend::outbound::memory::InMemoryCharacterStore;

/// Profile source answering every fetch with the same field map.
struct FixedProfileSource(Map<String, Value>);

#[async_trait]
impl ProfileSource for FixedProfileSource {
    async fn fetch_character(
        &self,
        _token: &str,
        _name: &CharacterName,
    ) -> Result<ProfileSnapshot, ProfileSourceError> {
        Ok(ProfileSnapshot::available(self.0.clone()))
    }
}

/// Profile source that always times out.
struct DownProfileSource;

#[async_trait]
impl ProfileSource for DownProfileSource {
    async fn fetch_character(
        &self,
        _token: &str,
        _name: &CharacterName,
    ) -> Result<ProfileSnapshot, ProfileSourceError> {
        Err(ProfileSourceError::timeout("deadline exceeded"))
    }
}

fn profile_fields() -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("race".to_owned(), json!("Asura"));
    fields.insert("level".to_owned(), json!(80));
    fields
}

fn record(character: &str, email: &str, alias: &str, privacy: &str) -> CharacterRecord {
    CharacterRecord {
        id: Uuid::new_v4(),
        name: CharacterName::new(character).expect("valid character name"),
        credential: ApiCredential {
            id: Uuid::new_v4(),
            token: "secret-token".to_owned(),
            account_name: format!("{alias}.1234"),
            owner: OwnerAccount {
                id: Uuid::new_v4(),
                email: email.to_owned(),
                alias: alias.to_owned(),
            },
        },
        guild_id: None,
        privacy: privacy.to_owned(),
        show_public: true,
        show_guild: true,
    }
}

fn build_state<P: ProfileSource + 'static>(
    store: &Arc<InMemoryCharacterStore>,
    profiles: P,
) -> HttpState {
    let service = Arc::new(CharacterService::new(
        Arc::clone(store),
        Arc::new(profiles),
    ));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let sampling = Arc::new(SamplingCache::new(
        Arc::clone(store),
        clock,
        SamplingConfig::default(),
    ));
    HttpState::new(service.clone(), service, sampling)
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session)
        .route(
            "/test/login/{email}",
            web::post().to(
                |session: SessionContext, path: web::Path<String>| async move {
                    session.persist_email(&path.into_inner())?;
                    Ok::<_, Error>(HttpResponse::Ok().finish())
                },
            ),
        )
        .service(web::scope("/api/v1").configure(characters::configure))
}

async fn login<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(&format!("/test/login/{email}"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login route must succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

async fn body_json<B: MessageBody>(response: ServiceResponse<B>) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}

#[actix_web::test]
async fn anonymous_read_merges_and_redacts() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![record("Zed", "a@x.com", "zed", "race")],
        Vec::new(),
    ));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert!(value.get("race").is_none(), "private field must be hidden");
    assert_eq!(value.get("level"), Some(&json!(80)));
    assert_eq!(value.get("apiTokenAvailable"), Some(&json!(true)));
    assert_eq!(value.get("privacy"), Some(&json!(["race"])));
    assert_eq!(value.get("accountName"), Some(&json!("zed.1234")));
    assert_eq!(value.get("alias"), Some(&json!("zed")));
    assert_eq!(value.pointer("/authorization/showPublic"), Some(&json!(true)));
}

#[actix_web::test]
async fn owner_read_keeps_private_fields() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![record("Zed", "a@x.com", "zed", "race")],
        Vec::new(),
    ));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let cookie = login(&app, "a@x.com").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value.get("race"), Some(&json!("Asura")));
    assert_eq!(value.get("level"), Some(&json!(80)));
}

#[actix_web::test]
async fn upstream_failure_degrades_the_read() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![record("Zed", "a@x.com", "zed", "race")],
        Vec::new(),
    ));
    let state = build_state(&store, DownProfileSource);
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value.get("apiTokenAvailable"), Some(&json!(false)));
    assert!(value.get("race").is_none());
    assert!(value.get("level").is_none());
    assert_eq!(value.get("alias"), Some(&json!("zed")));
}

#[actix_web::test]
async fn missing_character_is_not_found() {
    let store = Arc::new(InMemoryCharacterStore::new());
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Nobody")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value = body_json(response).await;
    assert_eq!(value.get("code"), Some(&json!("not_found")));
}

#[actix_web::test]
async fn guild_fields_appear_when_the_guild_resolves() {
    let guild = GuildRecord {
        id: Uuid::new_v4(),
        tag: "LGN".to_owned(),
        name: "The Legion".to_owned(),
    };
    let mut zed = record("Zed", "a@x.com", "zed", "");
    zed.guild_id = Some(guild.id);
    let store = Arc::new(InMemoryCharacterStore::with_data(vec![zed], vec![guild]));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .to_request(),
    )
    .await;

    let value = body_json(response).await;
    assert_eq!(value.get("guildTag"), Some(&json!("LGN")));
    assert_eq!(value.get("guildName"), Some(&json!("The Legion")));
}

#[actix_web::test]
async fn update_by_non_owner_is_rejected_and_unapplied() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![record("Zed", "a@x.com", "zed", "")],
        Vec::new(),
    ));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let cookie = login(&app, "c@z.com").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/characters/Zed")
            .cookie(cookie)
            .set_json(json!({ "showPublic": false }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The record must be untouched.
    let read = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .to_request(),
    )
    .await;
    let value = body_json(read).await;
    assert_eq!(value.pointer("/authorization/showPublic"), Some(&json!(true)));
}

#[actix_web::test]
async fn owner_update_changes_authorization_flags() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![record("Zed", "a@x.com", "zed", "")],
        Vec::new(),
    ));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let cookie = login(&app, "a@x.com").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/characters/Zed")
            .cookie(cookie)
            .set_json(json!({ "showPublic": false }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value.pointer("/authorization/showPublic"), Some(&json!(false)));
    assert!(value.get("token").is_none(), "credentials must not leak");
}

#[actix_web::test]
async fn privacy_round_trip_hides_then_reveals_a_field() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![record("Zed", "a@x.com", "zed", "")],
        Vec::new(),
    ));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login(&app, "a@x.com").await;

    let set = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/characters/Zed/privacy")
            .cookie(cookie.clone())
            .set_json(json!({ "privacy": "race" }))
            .to_request(),
    )
    .await;
    assert_eq!(set.status(), StatusCode::NO_CONTENT);

    let hidden = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .to_request(),
    )
    .await;
    let value = body_json(hidden).await;
    assert!(value.get("race").is_none());

    let remove = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/characters/Zed/privacy")
            .cookie(cookie)
            .set_json(json!({ "privacy": "race" }))
            .to_request(),
    )
    .await;
    assert_eq!(remove.status(), StatusCode::NO_CONTENT);

    let revealed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/Zed")
            .to_request(),
    )
    .await;
    let value = body_json(revealed).await;
    assert_eq!(value.get("race"), Some(&json!("Asura")));
}

#[actix_web::test]
async fn random_caps_the_sample_at_the_configured_maximum() {
    let records: Vec<CharacterRecord> = (0..30)
        .map(|i| record(&format!("Character {i}"), "a@x.com", "zed", ""))
        .collect();
    let store = Arc::new(InMemoryCharacterStore::with_data(records, Vec::new()));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/characters/random?n=25")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    let names = value.as_array().expect("array of names");
    assert_eq!(names.len(), 10);
    let distinct: std::collections::HashSet<&str> =
        names.iter().filter_map(Value::as_str).collect();
    assert_eq!(distinct.len(), 10, "sample must be distinct");
}

#[actix_web::test]
async fn characters_of_the_day_is_stable_between_calls() {
    let store = Arc::new(InMemoryCharacterStore::with_data(
        vec![
            record("Zed", "a@x.com", "zed", ""),
            record("Ana", "b@y.com", "ana", ""),
            record("Lyn", "a@x.com", "zed", ""),
        ],
        Vec::new(),
    ));
    let state = build_state(&store, FixedProfileSource(profile_fields()));
    let app = actix_test::init_service(test_app(state)).await;

    let first = body_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/characters/of-the-day")
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(first.as_array().map(Vec::len), Some(1));

    let second = body_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/characters/of-the-day")
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(second, first, "daily selection must be cached");
}
