use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::CookieSettings;
use super::handlers::get_me::get_me;
use super::handlers::health::health;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::sign_in::sign_in;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub cookies: CookieSettings,
}

pub fn create_router(auth_service: Arc<dyn AuthServicePort>, cookies: CookieSettings) -> Router {
    let state = AppState {
        auth_service,
        cookies,
    };

    let public_routes = Router::new()
        .route("/api/healthchecker", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(sign_in))
        .route("/api/auth/refresh", get(refresh).post(refresh));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_me))
        .route("/api/auth/logout", get(logout).post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers carry bearer tokens and cookies, so they stay out of the span.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::HashingParams;
    use auth::KeyMaterial;
    use auth::PasswordHasher;
    use auth::TokenCodec;
    use auth::TokenIssuer;
    use auth::TokenLifetimes;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::header::SET_COOKIE;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::service::AuthService;
    use crate::outbound::repositories::InMemoryUserDirectory;

    const PRIVATE_PEM: &str = include_str!("../../../../tests/fixtures/rsa_private.pem");
    const PUBLIC_PEM: &str = include_str!("../../../../tests/fixtures/rsa_public.pem");

    fn router() -> Router {
        let keys = KeyMaterial::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).unwrap();
        let issuer = TokenIssuer::new(
            TokenCodec::new(Arc::new(keys)),
            TokenLifetimes {
                access: chrono::Duration::minutes(15),
                refresh: chrono::Duration::minutes(60),
            },
        );
        let hasher = PasswordHasher::with_params(HashingParams {
            memory_cost_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let service = AuthService::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(hasher),
            issuer,
        );

        create_router(
            Arc::new(service),
            CookieSettings {
                access_max_age_seconds: 900,
                refresh_max_age_seconds: 3600,
                secure: false,
            },
        )
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthchecker() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/healthchecker")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_never_returns_password_hash() {
        let response = router()
            .oneshot(json_post(
                "/api/auth/register",
                serde_json::json!({
                    "email": "Alice@Example.com",
                    "password": "password123",
                    "password_confirm": "password123"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 201);
        assert_eq!(body["data"]["email"], "alice@example.com");
        assert_eq!(body["data"]["role"], "user");
        assert!(body["data"].get("password_hash").is_none());
        assert!(body["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_mismatch_is_unprocessable() {
        let response = router()
            .oneshot(json_post(
                "/api/auth/register",
                serde_json::json!({
                    "email": "bob@example.com",
                    "password": "password123",
                    "password_confirm": "password124"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_login_sets_token_cookies() {
        let app = router();
        let credentials = serde_json::json!({
            "email": "carol@example.com",
            "password": "password123",
            "password_confirm": "password123"
        });
        app.clone()
            .oneshot(json_post("/api/auth/register", credentials))
            .await
            .unwrap();

        let response = app
            .oneshot(json_post(
                "/api/auth/login",
                serde_json::json!({
                    "email": "carol@example.com",
                    "password": "password123"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
        assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
        assert!(cookies.iter().any(|c| c.starts_with("logged_in=true")));
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "You are not logged in");
    }
}
