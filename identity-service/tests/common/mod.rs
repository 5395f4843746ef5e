use std::sync::Arc;

use auth::HashingParams;
use auth::KeyMaterial;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenIssuer;
use auth::TokenLifetimes;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::cookies::CookieSettings;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserDirectory;

pub const PASSWORD: &str = "correct horse battery staple";

/// Test application that spawns a real server over an in-memory directory
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub directory: Arc<InMemoryUserDirectory>,
    pub codec: TokenCodec,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let keys = KeyMaterial::from_pem_files(
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rsa_private.pem"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rsa_public.pem"),
        )
        .expect("Failed to load test keys");
        let codec = TokenCodec::new(Arc::new(keys));
        let lifetimes = TokenLifetimes {
            access: chrono::Duration::minutes(15),
            refresh: chrono::Duration::minutes(60),
        };

        // Cheap work factor keeps the suite fast
        let hasher = PasswordHasher::with_params(HashingParams {
            memory_cost_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let directory = Arc::new(InMemoryUserDirectory::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&directory),
            Arc::new(hasher),
            TokenIssuer::new(codec.clone(), lifetimes),
        ));

        let router = create_router(
            auth_service,
            CookieSettings {
                access_max_age_seconds: lifetimes.access.num_seconds(),
                refresh_max_age_seconds: lifetimes.refresh.num_seconds(),
                secure: false,
            },
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            directory,
            codec,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// A second client without any stored cookies
    pub fn fresh_client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token and no cookies
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.fresh_client()
            .get(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub async fn register(&self, email: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "email": email,
                "password": PASSWORD,
                "password_confirm": PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and sign in, returning (user id, access token, refresh token)
    pub async fn signed_in_user(&self, email: &str) -> (String, String, String) {
        let registered: serde_json::Value = self.register(email).await.json().await.unwrap();
        let tokens: serde_json::Value = self.login(email, PASSWORD).await.json().await.unwrap();

        (
            registered["data"]["id"].as_str().unwrap().to_string(),
            tokens["data"]["access_token"].as_str().unwrap().to_string(),
            tokens["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}
