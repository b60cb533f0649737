use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use crate::auth::models::{
    AuthData, AuthResponse, LoginPayload, SignupPayload, UpdatePasswordPayload,
};
use crate::auth::token_service::{AuthConfig, TokenService};
use crate::error::{Error, Result};
use crate::helpers::thing_helpers::{parse_id_part, thing_to_string};
use crate::middlewares::mw_auth::Ctx;
use crate::models::user::UserRecord;
use crate::services::auth_service::AuthService;
use crate::services::email_service;
use crate::AppState;

pub struct AuthController;

impl AuthController {
    pub async fn signup(
        State(state): State<AppState>,
        Json(payload): Json<SignupPayload>,
    ) -> Result<Response> {
        let user = AuthService::signup(&state.db, payload).await?;

        // Non-fatal side channel: a failed welcome email never fails signup.
        if let Err(err) = email_service::send_welcome_email(&user.email, &user.name).await {
            tracing::warn!("welcome email failed (non-fatal): {err}");
        }

        send_token_response(user, StatusCode::CREATED, &state.auth_config)
    }

    pub async fn login(
        State(state): State<AppState>,
        Json(payload): Json<LoginPayload>,
    ) -> Result<Response> {
        let user = AuthService::login(&state.db, payload).await?;

        send_token_response(user, StatusCode::OK, &state.auth_config)
    }

    pub async fn update_my_password(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Json(payload): Json<UpdatePasswordPayload>,
    ) -> Result<Response> {
        let user = AuthService::update_password(&state.db, &ctx.user, payload).await?;

        // Re-issue the token so the client keeps a fresh session.
        send_token_response(user, StatusCode::OK, &state.auth_config)
    }
}

/// Issues a token for the user and returns it both in the body and as an
/// http-only cookie, with the password stripped from the user payload.
fn send_token_response(
    user: UserRecord,
    status: StatusCode,
    config: &AuthConfig,
) -> Result<Response> {
    let user_id = user.id.as_ref().ok_or(Error::DbError("User has no id".into()))?;
    let thing_str = thing_to_string(user_id);
    let sub = parse_id_part(&thing_str).to_string();

    let token = TokenService::create_token(sub, config)?;

    let cookie = format!(
        "jwt={}; HttpOnly; Path=/; Max-Age={}",
        token,
        config.token_duration_min * 60
    );

    let body = AuthResponse {
        status: "success",
        token,
        data: AuthData { user: user.into() },
    };

    Ok((status, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
