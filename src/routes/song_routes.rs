use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::controllers::song_controller::SongController;
use crate::middlewares::mw_auth::mw_auth;
use crate::AppState;

pub struct SongRoutes;

impl SongRoutes {
    /// Reads are open; mutations require an authenticated principal.
    pub fn routes(state: AppState) -> Router<AppState> {
        let public = Router::new()
            .route("/", get(SongController::get_all_songs))
            .route("/{id}", get(SongController::get_song));

        let protected = Router::new()
            .route("/", post(SongController::create_song))
            .route(
                "/{id}",
                patch(SongController::update_song).delete(SongController::delete_song),
            )
            .route_layer(middleware::from_fn_with_state(state, mw_auth));

        public.merge(protected)
    }
}
