pub mod auth_service;
pub mod email_service;
pub mod song_service;
pub mod stats_service;
pub mod user_service;
