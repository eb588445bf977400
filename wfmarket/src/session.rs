use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::fmt;

const HEADER_PLATFORM: &str = "platform";
const HEADER_LANGUAGE: &str = "language";
const HEADER_AUTH_TYPE: &str = "auth_type";
const APPLICATION_JSON: &str = "application/json";

/// Headers sent with every request, authenticated or not.
pub(crate) fn standard_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(HEADER_PLATFORM, HeaderValue::from_static("pc"));
    headers.insert(HEADER_LANGUAGE, HeaderValue::from_static("en"));
    headers
}

/// Headers for the signin call, which hands the token back in a response header.
pub(crate) fn sign_in_headers() -> HeaderMap {
    let mut headers = standard_headers();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("JWT"));
    headers.insert(HEADER_AUTH_TYPE, HeaderValue::from_static("header"));
    headers
}

#[derive(Serialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    auth_type: &'static str,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            auth_type: "header",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Bearer token returned by signin. Held in memory for one run.
#[derive(Clone, PartialEq)]
pub struct AuthSession {
    token: String,
}

impl AuthSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Standard headers plus `Authorization: <token>`.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = standard_headers();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&self.token)?);
        Ok(headers)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSession(***)")
    }
}
