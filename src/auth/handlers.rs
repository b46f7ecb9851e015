use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CredentialRequest, PublicProfile, TokenResponse},
        error::AuthResult,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialRequest>,
) -> AuthResult<(StatusCode, Json<PublicProfile>)> {
    let profile = state
        .accounts
        .register(payload.email, payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialRequest>,
) -> AuthResult<Json<TokenResponse>> {
    let res = state.accounts.login(payload.email, payload.password).await?;
    Ok(Json(res))
}
