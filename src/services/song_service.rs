use std::str::FromStr;

use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::error::{Error, Result};
use crate::helpers::thing_helpers::create_song_thing;
use crate::models::database_helpers::CountResult;
use crate::models::song::{
    CreateSongPayload, Genre, SongPatch, SongRecord, SongWithOwner, UpdateSongPayload,
    DEFAULT_IMAGE_URL,
};
use crate::models::user::UserRecord;
use crate::query::spec::QuerySpec;
use crate::query::surql::render_song_list;

pub struct SongService;

impl SongService {
    /// Executes a listing spec. The caller-facing `results` count is the
    /// length of the returned page, not the pre-pagination total; use
    /// [`SongService::count_songs`] for totals.
    pub async fn list_songs(db: &Surreal<Any>, spec: &QuerySpec) -> Result<Vec<serde_json::Value>> {
        let query = render_song_list(spec);

        let mut db_query = db.query(query.sql.as_str());
        for (name, value) in &query.binds {
            db_query = db_query.bind((name.clone(), value.clone()));
        }

        let mut response = db_query.await?;
        let songs: surrealdb::Value = response.take(0)?;
        let songs = match songs.into_inner().into_json() {
            serde_json::Value::Array(rows) => rows,
            serde_json::Value::Null => Vec::new(),
            other => vec![other],
        };

        Ok(songs)
    }

    /// Fetches a single song with the owner reference expanded to its public
    /// identity.
    pub async fn get_song(db: &Surreal<Any>, song_id: &str) -> Result<SongWithOwner> {
        let song_thing = create_song_thing(song_id);

        let sql = "SELECT *, \
            { id: owner.id, name: owner.name, email: owner.email } AS owner \
            FROM $song_thing;";

        let mut response = db.query(sql).bind(("song_thing", song_thing)).await?;
        let song: Option<SongWithOwner> = response.take(0)?;

        song.ok_or(Error::SongNotFound {
            id: song_id.to_string(),
        })
    }

    pub async fn create_song(
        db: &Surreal<Any>,
        payload: CreateSongPayload,
        owner: Thing,
    ) -> Result<SongRecord> {
        let genre = validate_create(&payload)?;

        let record = SongRecord {
            id: None,
            title: payload.title.trim().to_string(),
            artist: payload.artist.trim().to_string(),
            description: payload.description.map(|d| d.trim().to_string()),
            genre,
            duration: payload.duration,
            image_url: payload
                .image_url
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            audio_url: payload.audio_url,
            owner,
            created_at: chrono::Utc::now().into(),
        };

        db.create("song")
            .content(record)
            .await?
            .ok_or(Error::DbError("Could not create song".into()))
    }

    /// Existence is checked before ownership, so a missing record is always
    /// reported as not found rather than forbidden.
    pub async fn update_song(
        db: &Surreal<Any>,
        song_id: &str,
        payload: UpdateSongPayload,
        principal: &UserRecord,
    ) -> Result<SongRecord> {
        let song = Self::get_record(db, song_id).await?;

        if !can_mutate(principal, &song.owner) {
            return Err(Error::NotSongOwner);
        }

        let patch = validate_update(payload)?;

        let song_thing = create_song_thing(song_id);
        let updated: Option<SongRecord> = db
            .update((song_thing.tb.as_str(), song_thing.id.to_raw()))
            .merge(patch)
            .await?;

        updated.ok_or(Error::SongNotFound {
            id: song_id.to_string(),
        })
    }

    pub async fn delete_song(db: &Surreal<Any>, song_id: &str, principal: &UserRecord) -> Result<()> {
        let song = Self::get_record(db, song_id).await?;

        if !can_mutate(principal, &song.owner) {
            return Err(Error::NotSongOwner);
        }

        let song_thing = create_song_thing(song_id);
        let _deleted: Option<SongRecord> = db
            .delete((song_thing.tb.as_str(), song_thing.id.to_raw()))
            .await?;

        Ok(())
    }

    pub async fn count_songs(db: &Surreal<Any>) -> Result<u64> {
        let sql = "SELECT count() AS total FROM song GROUP ALL;";
        let mut response = db.query(sql).await?;
        let count: Option<CountResult> = response.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    async fn get_record(db: &Surreal<Any>, song_id: &str) -> Result<SongRecord> {
        let song_thing = create_song_thing(song_id);

        let mut response = db
            .query("SELECT * FROM $song_thing")
            .bind(("song_thing", song_thing))
            .await?;
        let song: Option<SongRecord> = response.take(0)?;

        song.ok_or(Error::SongNotFound {
            id: song_id.to_string(),
        })
    }
}

/// The ownership gate: a principal may mutate a song iff it owns the record
/// or carries the admin role.
pub fn can_mutate(principal: &UserRecord, owner: &Thing) -> bool {
    use crate::models::user::Role;

    if principal.role == Role::Admin {
        return true;
    }

    principal.id.as_ref().is_some_and(|id| id == owner)
}

fn validate_create(payload: &CreateSongPayload) -> Result<Genre> {
    let mut bad_fields = Vec::new();

    if payload.title.trim().is_empty() {
        bad_fields.push("title");
    }
    if payload.artist.trim().is_empty() {
        bad_fields.push("artist");
    }
    if payload.duration.trim().is_empty() {
        bad_fields.push("duration");
    }

    let genre = match Genre::from_str(&payload.genre) {
        Ok(genre) => Some(genre),
        Err(_) => {
            bad_fields.push("genre");
            None
        }
    };

    if !bad_fields.is_empty() {
        return Err(Error::Validation {
            message: format!("Invalid song fields: {}", bad_fields.join(", ")),
        });
    }

    genre.ok_or(Error::Validation {
        message: "Invalid song fields: genre".to_string(),
    })
}

fn validate_update(payload: UpdateSongPayload) -> Result<SongPatch> {
    let mut bad_fields = Vec::new();

    if payload.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        bad_fields.push("title");
    }
    if payload.artist.as_deref().is_some_and(|a| a.trim().is_empty()) {
        bad_fields.push("artist");
    }
    if payload
        .duration
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        bad_fields.push("duration");
    }

    let genre = match payload.genre.as_deref() {
        None => None,
        Some(raw) => match Genre::from_str(raw) {
            Ok(genre) => Some(genre),
            Err(_) => {
                bad_fields.push("genre");
                None
            }
        },
    };

    if !bad_fields.is_empty() {
        return Err(Error::Validation {
            message: format!("Invalid song fields: {}", bad_fields.join(", ")),
        });
    }

    Ok(SongPatch {
        title: payload.title,
        artist: payload.artist,
        description: payload.description,
        genre,
        duration: payload.duration,
        image_url: payload.image_url,
        audio_url: payload.audio_url,
    })
}
