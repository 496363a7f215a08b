//! Backend entry-point: wires REST endpoints, adapters, and OpenAPI docs.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::SameSite;
use actix_web::{web, App, HttpServer};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use armory_backend::domain::character_service::CharacterService;
use armory_backend::domain::sampling_cache::SamplingCache;
use armory_backend::inbound::http::characters;
use armory_backend::inbound::http::health::{live, ready, HealthState};
use armory_backend::inbound::http::state::HttpState;
use armory_backend::outbound::gw2::Gw2HttpSource;
use armory_backend::outbound::memory::InMemoryCharacterStore;
use armory_backend::server::{load_session_key, AppConfig};
#[cfg(debug_assertions)]
use armory_backend::ApiDoc;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load_from_iter(std::env::args_os()).map_err(|error| {
        std::io::Error::other(format!("failed to load configuration: {error}"))
    })?;

    let base_url = Url::parse(config.profile_api_url())
        .map_err(|error| std::io::Error::other(format!("invalid profile API URL: {error}")))?;
    let profiles = Arc::new(
        Gw2HttpSource::new(base_url, config.profile_timeout()).map_err(|error| {
            std::io::Error::other(format!("failed to build profile client: {error}"))
        })?,
    );

    // The record store is an external collaborator; swap this adapter to
    // point at a real deployment.
    let records = Arc::new(InMemoryCharacterStore::new());
    warn!("using the in-memory record store; records will not survive a restart");

    let service = Arc::new(CharacterService::new(Arc::clone(&records), profiles));
    let sampling = Arc::new(SamplingCache::new(
        Arc::clone(&records),
        Arc::new(DefaultClock),
        config.sampling(),
    ));
    let http_state = HttpState::new(service.clone(), service, sampling);

    let key = load_session_key(&config.session_key_file(), config.session_allow_ephemeral())?;
    let cookie_secure = config.session_cookie_secure();

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr().to_owned();
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .configure(characters::configure);

        let mut app = App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(http_state.clone()))
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
