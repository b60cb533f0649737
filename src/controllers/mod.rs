pub mod auth_controller;
pub mod dashboard_controller;
pub mod song_controller;
pub mod user_controller;
