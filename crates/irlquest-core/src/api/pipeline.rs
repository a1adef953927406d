//! Authenticated request pipeline
//!
//! Every outgoing request passes through [`AuthPipeline::authorize`], which
//! reads the session and attaches `Authorization: Bearer <token>` when a
//! non-empty token is stored. The token is re-read on every request, so a
//! logout takes effect on the very next call.

use std::sync::Arc;

use reqwest::RequestBuilder;

use crate::session::Session;

/// Attaches the session token to outgoing requests
#[derive(Debug, Clone)]
pub struct AuthPipeline {
    session: Arc<Session>,
}

impl AuthPipeline {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// The session this pipeline reads from
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Token to send with the next request, if any
    pub fn bearer_token(&self) -> Option<String> {
        self.session.get().filter(|t| !t.is_empty())
    }

    /// Add the bearer credential to a request, or leave it unauthenticated
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn auth_header(pipeline: &AuthPipeline) -> Option<String> {
        let client = reqwest::Client::new();
        let request = pipeline
            .authorize(client.get("http://localhost/tasks"))
            .build()
            .unwrap();
        request
            .headers()
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn test_no_token_no_header() {
        let pipeline = AuthPipeline::new(Arc::new(Session::in_memory()));
        assert!(auth_header(&pipeline).is_none());
    }

    #[test]
    fn test_token_becomes_bearer_header() {
        let session = Arc::new(Session::in_memory());
        session.save("abc123");
        let pipeline = AuthPipeline::new(session);

        assert_eq!(auth_header(&pipeline).as_deref(), Some("Bearer abc123"));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let session = Arc::new(Session::in_memory());
        session.save("");
        let pipeline = AuthPipeline::new(session);

        assert!(pipeline.bearer_token().is_none());
        assert!(auth_header(&pipeline).is_none());
    }

    #[test]
    fn test_token_is_reread_per_request() {
        let session = Arc::new(Session::in_memory());
        let pipeline = AuthPipeline::new(Arc::clone(&session));

        session.save("first");
        assert_eq!(auth_header(&pipeline).as_deref(), Some("Bearer first"));

        session.save("second");
        assert_eq!(auth_header(&pipeline).as_deref(), Some("Bearer second"));

        session.clear();
        assert!(auth_header(&pipeline).is_none());
    }
}
