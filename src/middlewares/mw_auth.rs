use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::auth::token_service::{Claims, TokenService};
use crate::error::{Error, Result};
use crate::helpers::thing_helpers::create_user_thing;
use crate::models::user::{Role, UserRecord};
use crate::AppState;

/// The resolved principal of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ctx {
    pub user_id: String,
    pub user: UserRecord,
}

impl Ctx {
    pub fn new(user_id: String, user: UserRecord) -> Self {
        Self { user_id, user }
    }
}

/// Resolves the bearer token into a `Ctx` request extension, or rejects with
/// 401. The subject must still exist; a user deleted after token issuance is
/// treated as unauthenticated.
pub async fn mw_auth(
    State(app_state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|str| str.strip_prefix("Bearer "))
        .ok_or(Error::AuthFailNoToken)?;

    let claims: Claims = TokenService::validate_token(token, &app_state.auth_config)?;

    let user_thing = create_user_thing(&claims.sub);

    let mut result = app_state
        .db
        .query("SELECT * FROM $user_thing")
        .bind(("user_thing", user_thing))
        .await?;
    let user: Option<UserRecord> = result.take(0)?;

    let user = user.ok_or(Error::AuthFailUserGone)?;

    let ctx = Ctx::new(claims.sub, user);
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Role gate, evaluated after identity resolution and independent of record
/// ownership.
pub fn require_role(ctx: &Ctx, roles: &[Role]) -> Result<()> {
    if roles.contains(&ctx.user.role) {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

/// Route layer for admin-only surfaces. Must run inside `mw_auth`.
pub async fn mw_require_admin(req: Request<Body>, next: Next) -> Result<Response> {
    let ctx = req
        .extensions()
        .get::<Ctx>()
        .ok_or(Error::AuthFailNoToken)?;

    require_role(ctx, &[Role::Admin])?;

    Ok(next.run(req).await)
}
