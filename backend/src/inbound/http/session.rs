//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The requester's email lives in the cookie session. Establishing it is
//! the job of the account service sharing the cookie; this adapter only
//! reads it back, treating an absent value as an anonymous requester.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;

pub(crate) const EMAIL_KEY: &str = "email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the requester's email in the session cookie.
    pub fn persist_email(&self, email: &str) -> Result<(), Error> {
        self.0
            .insert(EMAIL_KEY, email)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the requester's email from the session, if present.
    pub fn requester_email(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(EMAIL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
