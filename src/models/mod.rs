pub mod song;
pub mod user;

pub mod database_helpers;
