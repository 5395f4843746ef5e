use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::SignInCommand;
use crate::inbound::http::router::AppState;

/// Exchange credentials for a token pair.
///
/// Tokens are returned in the body and also set as cookies so browser
/// clients can authenticate without handling them.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<(HeaderMap, ApiSuccess<SignInResponseData>), ApiError> {
    let pair = state
        .auth_service
        .sign_in(SignInCommand::new(body.email, body.password))
        .await?;

    let mut headers = HeaderMap::new();
    let cookies = [
        state.cookies.access_cookie(&pair.access_token),
        state.cookies.refresh_cookie(&pair.refresh_token),
        state.cookies.logged_in_cookie(),
    ];
    for cookie in cookies {
        let cookie = cookie.map_err(|e| anyhow::anyhow!("invalid cookie header: {e}"))?;
        headers.append(SET_COOKIE, cookie);
    }

    Ok((
        headers,
        ApiSuccess::new(
            StatusCode::OK,
            SignInResponseData {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInResponseData {
    pub access_token: String,
    pub refresh_token: String,
}
