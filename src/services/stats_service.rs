use serde::{Deserialize, Serialize};
use surrealdb::{engine::any::Any, Surreal};

use crate::error::Result;
use crate::models::database_helpers::CountResult;
use crate::models::song::Genre;
use crate::services::song_service::SongService;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: Genre,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_songs: u64,
    pub genre_distribution: Vec<GenreCount>,
}

pub struct StatsService;

impl StatsService {
    pub async fn get_stats(db: &Surreal<Any>) -> Result<DashboardStats> {
        let user_count_sql = "SELECT count() AS total FROM user GROUP ALL;";
        let genre_sql = "SELECT genre, count() AS count FROM song GROUP BY genre ORDER BY genre;";

        let (user_count_result, song_count, genre_result) = tokio::join!(
            db.query(user_count_sql),
            SongService::count_songs(db),
            db.query(genre_sql)
        );

        let mut user_count_response = user_count_result?;
        let user_count: Option<CountResult> = user_count_response.take(0)?;

        let mut genre_response = genre_result?;
        let genre_distribution: Vec<GenreCount> = genre_response.take(0)?;

        Ok(DashboardStats {
            total_users: user_count.map(|c| c.total).unwrap_or(0),
            total_songs: song_count?,
            genre_distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::song::CreateSongPayload;
    use crate::models::user::{Role, UserRecord};
    use crate::services::song_service::SongService;
    use surrealdb::engine::any::connect;

    #[tokio::test]
    async fn test_stats_counts_and_histogram() {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        let user: UserRecord = db
            .create("user")
            .content(UserRecord {
                id: None,
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password: "hash".to_string(),
                role: Role::User,
                created_at: chrono::Utc::now().into(),
                password_changed_at: None,
            })
            .await
            .unwrap()
            .unwrap();

        for genre in ["Pop", "Pop", "Lofi"] {
            SongService::create_song(
                &db,
                CreateSongPayload {
                    title: "T".to_string(),
                    artist: "A".to_string(),
                    description: None,
                    genre: genre.to_string(),
                    duration: "3:00".to_string(),
                    image_url: None,
                    audio_url: None,
                },
                user.id.clone().unwrap(),
            )
            .await
            .unwrap();
        }

        let stats = StatsService::get_stats(&db).await.unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_songs, 3);

        let pop = stats
            .genre_distribution
            .iter()
            .find(|g| g.genre == Genre::Pop)
            .unwrap();
        assert_eq!(pop.count, 2);

        let lofi = stats
            .genre_distribution
            .iter()
            .find(|g| g.genre == Genre::Lofi)
            .unwrap();
        assert_eq!(lofi.count, 1);
    }
}
