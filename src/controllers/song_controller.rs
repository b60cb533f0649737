use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middlewares::mw_auth::Ctx;
use crate::models::song::{CreateSongPayload, UpdateSongPayload};
use crate::query::spec::QuerySpec;
use crate::services::song_service::SongService;
use crate::AppState;

pub struct SongController;

impl SongController {
    /// `results` is the length of the returned page, not the total match
    /// count; callers wanting totals issue a separate count query.
    pub async fn get_all_songs(
        State(state): State<AppState>,
        Query(params): Query<BTreeMap<String, String>>,
    ) -> Result<Json<serde_json::Value>> {
        let spec = QuerySpec::from_params(&params)?;
        let songs = SongService::list_songs(&state.db, &spec).await?;

        Ok(Json(json!({
            "status": "success",
            "results": songs.len(),
            "data": { "songs": songs },
        })))
    }

    pub async fn get_song(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Json<serde_json::Value>> {
        let song = SongService::get_song(&state.db, &id).await?;

        Ok(Json(json!({
            "status": "success",
            "data": { "song": song },
        })))
    }

    pub async fn create_song(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Json(payload): Json<CreateSongPayload>,
    ) -> Result<(StatusCode, Json<serde_json::Value>)> {
        let owner = ctx
            .user
            .id
            .clone()
            .ok_or(Error::DbError("User has no id".into()))?;

        let song = SongService::create_song(&state.db, payload, owner).await?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "status": "success",
                "data": { "song": song },
            })),
        ))
    }

    pub async fn update_song(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(id): Path<String>,
        Json(payload): Json<UpdateSongPayload>,
    ) -> Result<Json<serde_json::Value>> {
        let song = SongService::update_song(&state.db, &id, payload, &ctx.user).await?;

        Ok(Json(json!({
            "status": "success",
            "data": { "song": song },
        })))
    }

    pub async fn delete_song(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(id): Path<String>,
    ) -> Result<StatusCode> {
        SongService::delete_song(&state.db, &id, &ctx.user).await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
