//! Cookie-based session extractor.

use crate::session::SessionId;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use std::convert::Infallible;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "MOVIESTORE_SESSION";

/// The visitor's session, read from the cookie or freshly generated.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// True when no cookie was sent; the response must set one.
    pub is_new: bool,
}

impl Session {
    /// Session id carried by the request's cookies, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
            .map(|(_, value)| SessionId::new(value))
    }

    /// `Set-Cookie` value establishing this session.
    pub fn cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.id
        )
    }

    /// Turn `body` into a response, setting the cookie for new sessions.
    pub fn attach(&self, body: impl IntoResponse) -> Response {
        let mut response = body.into_response();
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&self.cookie()) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match Session::from_headers(&parts.headers) {
            Some(id) => Session { id, is_new: false },
            None => {
                let id = SessionId::generate();
                debug!("Starting session {}", id);
                Session { id, is_new: true }
            }
        })
    }
}
