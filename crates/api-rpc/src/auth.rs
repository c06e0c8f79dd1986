//! Bearer-token guard for the HTTP transport

use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::{HeaderValue, Request, Response, StatusCode};
use jsonrpsee::server::HttpBody;
use tower_http::validate_request::{ValidateRequest, ValidateRequestHeaderLayer};
use tracing::warn;

/// Accepts every request when no token is configured, otherwise requires
/// `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    expected: Option<String>,
}

impl BearerAuth {
    pub fn new(token: Option<String>) -> Self {
        Self {
            expected: token.map(|t| format!("Bearer {}", t)),
        }
    }

    /// Wrap as a tower layer for `Server::builder().set_http_middleware`
    pub fn layer(self) -> ValidateRequestHeaderLayer<Self> {
        ValidateRequestHeaderLayer::custom(self)
    }

    fn authorized<B>(&self, request: &Request<B>) -> bool {
        let Some(expected) = &self.expected else {
            return true;
        };
        request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected)
    }
}

impl<B> ValidateRequest<B> for BearerAuth {
    type ResponseBody = HttpBody;

    fn validate(&mut self, request: &mut Request<B>) -> Result<(), Response<Self::ResponseBody>> {
        if self.authorized(request) {
            return Ok(());
        }

        warn!(uri = %request.uri(), "Rejected request without valid bearer token");

        let mut response = Response::new(HttpBody::from("Unauthorized".to_string()));
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        Err(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(auth: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_open_when_no_token() {
        let mut auth = BearerAuth::new(None);
        assert!(auth.validate(&mut request(None)).is_ok());
        assert!(auth.validate(&mut request(Some("Bearer anything"))).is_ok());
    }

    #[test]
    fn test_requires_matching_token() {
        let mut auth = BearerAuth::new(Some("s3cret".to_string()));

        assert!(auth.validate(&mut request(Some("Bearer s3cret"))).is_ok());

        let rejected = auth.validate(&mut request(Some("Bearer wrong"))).unwrap_err();
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        let missing = auth.validate(&mut request(None)).unwrap_err();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.headers()[WWW_AUTHENTICATE], "Bearer");

        // Scheme is required
        assert!(auth.validate(&mut request(Some("s3cret"))).is_err());
    }
}
