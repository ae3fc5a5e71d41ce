//! Credential guard for routes that talk to the upstream API.
//!
//! The relay does not validate credentials itself; it only requires that the
//! caller supplies both of them so they can be forwarded upstream.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// Header carrying the upstream API key.
pub const API_KEY_HEADER: &str = "api_key";

/// Header carrying the upstream user id.
pub const USER_ID_HEADER: &str = "user_id";

/// Message returned when either credential header is missing.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "No api key or user id found";

/// Upstream credentials supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub user_id: String,
}

/// Which credential headers were absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCredential {
    ApiKey,
    UserId,
    Both,
}

impl MissingCredential {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingCredential::ApiKey => "api_key",
            MissingCredential::UserId => "user_id",
            MissingCredential::Both => "api_key and user_id",
        }
    }
}

/// Outcome of inspecting a request's credential headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Authorized(Credentials),
    Unauthorized(MissingCredential),
}

impl Authorization {
    /// Inspect the credential headers.
    ///
    /// A header counts as missing when it is absent, empty, or not visible ASCII.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let api_key = header_value(headers, API_KEY_HEADER);
        let user_id = header_value(headers, USER_ID_HEADER);

        match (api_key, user_id) {
            (Some(api_key), Some(user_id)) => Authorization::Authorized(Credentials {
                api_key: api_key.to_string(),
                user_id: user_id.to_string(),
            }),
            (None, Some(_)) => Authorization::Unauthorized(MissingCredential::ApiKey),
            (Some(_), None) => Authorization::Unauthorized(MissingCredential::UserId),
            (None, None) => Authorization::Unauthorized(MissingCredential::Both),
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Middleware that rejects requests lacking either credential header.
///
/// On success the [`Credentials`] are placed in the request extensions for
/// handlers to extract.
pub async fn credential_guard(mut request: Request, next: Next) -> Response {
    match Authorization::from_headers(request.headers()) {
        Authorization::Authorized(credentials) => {
            request.extensions_mut().insert(credentials);
            next.run(request).await
        }
        Authorization::Unauthorized(missing) => {
            tracing::debug!(
                missing = missing.as_str(),
                path = %request.uri().path(),
                "Rejecting request without credentials"
            );
            AppError::MissingCredentials(MISSING_CREDENTIALS_MESSAGE.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(name, value) in pairs {
            map.insert(name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_both_headers_present() {
        let auth = Authorization::from_headers(&headers(&[
            (API_KEY_HEADER, "abc"),
            (USER_ID_HEADER, "123"),
        ]));
        assert_eq!(
            auth,
            Authorization::Authorized(Credentials {
                api_key: "abc".to_string(),
                user_id: "123".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_reason() {
        assert_eq!(
            Authorization::from_headers(&headers(&[(USER_ID_HEADER, "123")])),
            Authorization::Unauthorized(MissingCredential::ApiKey)
        );
        assert_eq!(
            Authorization::from_headers(&headers(&[(API_KEY_HEADER, "abc")])),
            Authorization::Unauthorized(MissingCredential::UserId)
        );
        assert_eq!(
            Authorization::from_headers(&HeaderMap::new()),
            Authorization::Unauthorized(MissingCredential::Both)
        );
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        assert_eq!(
            Authorization::from_headers(&headers(&[(API_KEY_HEADER, ""), (USER_ID_HEADER, "123")])),
            Authorization::Unauthorized(MissingCredential::ApiKey)
        );
    }
}
