pub mod song_routes;
pub mod user_routes;
