use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::controllers::auth_controller::AuthController;
use crate::controllers::dashboard_controller::DashboardController;
use crate::controllers::user_controller::UserController;
use crate::middlewares::mw_auth::{mw_auth, mw_require_admin};
use crate::AppState;

pub struct UserRoutes;

impl UserRoutes {
    pub fn routes(state: AppState) -> Router<AppState> {
        let public = Router::new()
            .route("/signup", post(AuthController::signup))
            .route("/login", post(AuthController::login));

        let protected = Router::new()
            .route("/updateMyPassword", patch(AuthController::update_my_password))
            .route("/me", get(UserController::get_me))
            .route("/updateMe", patch(UserController::update_me))
            .route("/deleteMe", delete(UserController::delete_me))
            .route_layer(middleware::from_fn_with_state(state.clone(), mw_auth));

        // Admin gate runs inside the auth layer.
        let admin = Router::new()
            .route("/stats", get(DashboardController::get_stats))
            .route("/", get(UserController::get_all_users))
            .route("/{id}/role", patch(UserController::set_role))
            .route_layer(middleware::from_fn(mw_require_admin))
            .route_layer(middleware::from_fn_with_state(state, mw_auth));

        public.merge(protected).merge(admin)
    }
}
