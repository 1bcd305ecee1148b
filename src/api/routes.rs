//! Router configuration for the API.

use std::time::Duration;

use axum::http::{HeaderName, Method, StatusCode, header};
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    REQUEST_ID_HEADER, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the application router with all routes, docs and middleware.
///
/// # Middleware Order
/// Outermost first: CORS, compression, request id, logging, error body
/// normalization, request timeout. The timeout sits inside the error
/// handler so a timed-out request still gets a JSON body.
///
/// # Routes
/// - `/api/users`, `/api/sessions`, `/api/meetups`
/// - `/health`, `/health/ready`, `/health/live`
/// - `/swagger-ui`, `/api-docs/openapi.json`
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .merge(handlers::users::user_routes())
        .merge(handlers::sessions::session_routes())
        .merge(handlers::meetups::meetup_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(86400))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::JwtConfig;
    use axum::body::Body;
    use axum::http::Request;
    use jiff::tz::TimeZone;
    use jiff::{SignedDuration, Timestamp};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        clock: Arc<ManualClock>,
    }

    impl TestApp {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new(
                "2030-01-01T10:00:00Z".parse::<Timestamp>().unwrap(),
            ));
            let jwt_config = JwtConfig {
                secret: "router-test-secret-that-is-long-enough".to_string(),
                ..Default::default()
            };
            let state = AppState::in_memory(jwt_config, clock.clone(), TimeZone::UTC);
            Self {
                router: create_router(state, Duration::from_secs(30)),
                clock,
            }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        /// Signs up and logs in, returning the access token.
        async fn user(&self, name: &str, email: &str) -> String {
            let (status, _) = self
                .send(
                    Method::POST,
                    "/api/users",
                    None,
                    Some(json!({ "name": name, "email": email, "password": "secret1" })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);

            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/sessions",
                    None,
                    Some(json!({ "email": email, "password": "secret1" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            body["access_token"].as_str().unwrap().to_string()
        }
    }

    fn meetup_body(title: &str, date: &str) -> Value {
        json!({
            "title": title,
            "description": "Talks and pizza",
            "location": "Main hall",
            "date": date,
        })
    }

    #[tokio::test]
    async fn test_signup_validation_and_duplicates() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "name": "", "email": "bad", "password": "1" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"].as_array().unwrap().len(), 3);

        app.user("Jane", "jane@example.com").await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "name": "Jane", "email": "jane@example.com", "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE");
    }

    #[tokio::test]
    async fn test_login_and_refresh() {
        let app = TestApp::new();
        app.user("Jane", "jane@example.com").await;

        let (status, _) = app
            .send(
                Method::POST,
                "/api/sessions",
                None,
                Some(json!({ "email": "jane@example.com", "password": "wrong-one" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, session) = app
            .send(
                Method::POST,
                "/api/sessions",
                None,
                Some(json!({ "email": "jane@example.com", "password": "secret1" })),
            )
            .await;
        assert_eq!(session["user"]["name"], "Jane");
        assert_eq!(session["token_type"], "Bearer");

        let (status, refreshed) = app
            .send(
                Method::POST,
                "/api/sessions/refresh",
                None,
                Some(json!({ "refresh_token": session["refresh_token"] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(refreshed["access_token"].is_string());
    }

    #[tokio::test]
    async fn test_profile_update() {
        let app = TestApp::new();
        let token = app.user("Jane", "jane@example.com").await;

        let (status, body) = app
            .send(
                Method::PUT,
                "/api/users",
                Some(&token),
                Some(json!({ "name": "Jane Doe" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jane Doe");
        assert!(body.get("password_hash").is_none());

        let (status, body) = app
            .send(
                Method::PUT,
                "/api/users",
                Some(&token),
                Some(json!({
                    "oldPassword": "not-mine",
                    "password": "secret2",
                    "confirmPassword": "secret2"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Password does not match");

        let (status, _) = app
            .send(Method::PUT, "/api/users", None, Some(json!({ "name": "x" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_meetups_require_authentication() {
        let app = TestApp::new();

        let (status, body) = app.send(Method::GET, "/api/meetups", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = app
            .send(Method::GET, "/api/meetups", Some("not-a-token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_meetup_lifecycle() {
        let app = TestApp::new();
        let organizer = app.user("Jane", "jane@example.com").await;
        let stranger = app.user("John", "john@example.com").await;

        let (status, created) = app
            .send(
                Method::POST,
                "/api/meetups",
                Some(&organizer),
                Some(meetup_body("Rust Night", "2030-01-03T19:45:00Z")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["date"], "2030-01-03T19:00:00Z");
        let id = created["id"].as_i64().unwrap();

        let (status, page) = app
            .send(Method::GET, "/api/meetups?date=2030-01-03", Some(&stranger), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().unwrap().len(), 1);
        assert_eq!(page["pagination"]["total_items"], 1);

        let (status, page) = app
            .send(Method::GET, "/api/meetups?date=2030-01-04", Some(&stranger), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(page["data"].as_array().unwrap().is_empty());

        let uri = format!("/api/meetups/{id}");
        let (status, _) = app
            .send(Method::PUT, &uri, Some(&stranger), Some(json!({ "title": "Mine now" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, updated) = app
            .send(Method::PUT, &uri, Some(&organizer), Some(json!({ "title": "Rust & Coffee" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Rust & Coffee");

        app.clock.advance(SignedDuration::from_hours(24));
        let (status, cancelled) = app.send(Method::DELETE, &uri, Some(&organizer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["meetup"]["id"], id);

        let (status, body) = app.send(Method::DELETE, &uri, Some(&organizer), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_meetup_date_rules() {
        let app = TestApp::new();
        let token = app.user("Jane", "jane@example.com").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/meetups",
                Some(&token),
                Some(meetup_body("Too soon", "2030-01-01T10:30:00Z")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "PAST_DATE");

        let (_, created) = app
            .send(
                Method::POST,
                "/api/meetups",
                Some(&token),
                Some(meetup_body("Soon", "2030-01-01T12:00:00Z")),
            )
            .await;
        let uri = format!("/api/meetups/{}", created["id"]);

        app.clock.advance(SignedDuration::from_hours(3));
        let (status, body) = app
            .send(Method::PUT, &uri, Some(&token), Some(json!({ "title": "Later" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "PAST_DATE");

        let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_input_is_bad_request() {
        let app = TestApp::new();
        let token = app.user("Jane", "jane@example.com").await;

        for uri in ["/api/meetups?page=0", "/api/meetups?page=abc", "/api/meetups?date=tomorrow"] {
            let (status, _) = app.send(Method::GET, uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }

        let (status, _) = app
            .send(Method::DELETE, "/api/meetups/abc", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(Method::POST, "/api/meetups", Some(&token), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_health_docs_and_fallbacks() {
        let app = TestApp::new();

        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = app.send(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, doc) = app
            .send(Method::GET, "/api-docs/openapi.json", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/meetups/{id}"].is_object());

        let (status, body) = app.send(Method::GET, "/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let app = TestApp::new();
        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
