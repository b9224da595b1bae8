use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// CORS for the admin back-office and the mobile app's web preview.
pub fn create_cors_layer(allowed_origins: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn parse_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

fn allow_origin(origins: &str) -> AllowOrigin {
    let origins = parse_origins(origins);

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, cross-origin requests are refused");
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
    }
    AllowOrigin::list(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blank_entries() {
        let origins = parse_origins("http://localhost:3000, ,http://localhost:8081,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "http://localhost:8081");
    }

    #[test]
    fn test_parse_origins_drops_invalid_values() {
        let origins = parse_origins("http://admin.fairway.test,bad\norigin");
        assert_eq!(origins, vec![HeaderValue::from_static("http://admin.fairway.test")]);
    }

    async fn allowed_origin(configured: &str, origin: &str) -> Option<HeaderValue> {
        use axum::body::Body;
        use axum::http::Request;
        use axum::routing::get;
        use axum::Router;
        use tower::ServiceExt;

        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(create_cors_layer(configured));
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_empty_list_allows_no_origin() {
        assert_eq!(allowed_origin("", "https://elsewhere.test").await, None);
        assert_eq!(allowed_origin(" , ", "https://elsewhere.test").await, None);
    }

    #[tokio::test]
    async fn test_listed_origin_is_echoed() {
        let configured = "http://admin.fairway.test";
        assert_eq!(
            allowed_origin(configured, configured).await,
            Some(HeaderValue::from_static("http://admin.fairway.test"))
        );
        assert_eq!(allowed_origin(configured, "https://elsewhere.test").await, None);
    }
}
