use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::json;

use crate::error::Result;
use crate::middlewares::mw_auth::Ctx;
use crate::models::user::UserPublic;
use crate::services::user_service::{SetRolePayload, UpdateMePayload, UserService};
use crate::AppState;

pub struct UserController;

impl UserController {
    pub async fn get_me(Extension(ctx): Extension<Ctx>) -> Result<Json<serde_json::Value>> {
        let user = UserPublic::from(ctx.user);

        Ok(Json(json!({
            "status": "success",
            "data": { "user": user },
        })))
    }

    pub async fn update_me(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Json(payload): Json<UpdateMePayload>,
    ) -> Result<Json<serde_json::Value>> {
        let user = UserService::update_me(&state.db, &ctx.user, payload).await?;

        Ok(Json(json!({
            "status": "success",
            "data": { "user": UserPublic::from(user) },
        })))
    }

    pub async fn delete_me(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
    ) -> Result<StatusCode> {
        UserService::delete_me(&state.db, &ctx.user).await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn get_all_users(
        State(state): State<AppState>,
    ) -> Result<Json<serde_json::Value>> {
        let users = UserService::get_all_users(&state.db).await?;

        Ok(Json(json!({
            "status": "success",
            "results": users.len(),
            "data": { "users": users },
        })))
    }

    pub async fn set_role(
        State(state): State<AppState>,
        Path(user_id): Path<String>,
        Json(payload): Json<SetRolePayload>,
    ) -> Result<Json<serde_json::Value>> {
        let user = UserService::set_role(&state.db, &user_id, payload).await?;

        Ok(Json(json!({
            "status": "success",
            "data": { "user": user },
        })))
    }
}
