use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

const NOSNIFF: &str = "nosniff";
const DENY: &str = "DENY";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Response headers added to every gateway response.
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    include_hsts: bool,
}

impl SecurityHeaders {
    pub fn new(include_hsts: bool) -> Self {
        Self { include_hsts }
    }

    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static(NOSNIFF),
            ),
            (
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static(DENY),
            ),
            (
                HeaderName::from_static("content-security-policy"),
                HeaderValue::from_static(CSP_API_VALUE),
            ),
            (
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static(REFERRER_POLICY_VALUE),
            ),
        ];

        // HTTPS deployments only
        if self.include_hsts {
            headers.push((
                HeaderName::from_static("strict-transport-security"),
                HeaderValue::from_static(HSTS_VALUE),
            ));
        }
        headers
    }

    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.headers().into_iter().fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsts_only_when_enabled() {
        let hsts = HeaderName::from_static("strict-transport-security");

        let dev = SecurityHeaders::new(false).headers();
        assert!(dev.iter().all(|(name, _)| *name != hsts));

        let prod = SecurityHeaders::new(true).headers();
        assert!(prod.iter().any(|(name, _)| *name == hsts));
    }
}
