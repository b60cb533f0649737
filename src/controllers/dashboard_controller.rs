use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::error::Result;
use crate::services::stats_service::StatsService;
use crate::AppState;

pub struct DashboardController;

impl DashboardController {
    pub async fn get_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
        let stats = StatsService::get_stats(&state.db).await?;

        Ok(Json(json!({
            "status": "success",
            "data": {
                "totalUsers": stats.total_users,
                "totalSongs": stats.total_songs,
                "genreDistribution": stats.genre_distribution,
            },
        })))
    }
}
