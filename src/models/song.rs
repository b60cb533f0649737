use serde::{Deserialize, Serialize};
use surrealdb::{sql::Thing, Datetime};
use strum_macros::{Display, EnumString};

pub const DEFAULT_IMAGE_URL: &str = "default-music.jpg";

#[derive(Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Clone, Copy)]
pub enum Genre {
    Pop,
    Rock,
    Electronic,
    Lofi,
    Study,
    Fusion,
    Acoustic,
    Jazz,
    Classical,
    HipHop,
    Qawwali,
    Sufi,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SongRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,

    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub genre: Genre,
    /// Free-form display duration, e.g. "3:45".
    pub duration: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// Set once at creation from the acting principal, immutable after.
    pub owner: Thing,
    pub created_at: Datetime,
}

/// Song with the owner reference expanded to its public identity,
/// returned by the single-song endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SongWithOwner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub genre: Genre,
    pub duration: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub owner: OwnerPublic,
    pub created_at: Datetime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OwnerPublic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSongPayload {
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub genre: String,
    pub duration: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSongPayload {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

/// Validated partial update, merged into the stored record.
/// There is deliberately no `owner` field here.
#[derive(Debug, Serialize)]
pub struct SongPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_genre_parsing() {
        assert_eq!(Genre::from_str("Pop").unwrap(), Genre::Pop);
        assert_eq!(Genre::from_str("HipHop").unwrap(), Genre::HipHop);
        assert_eq!(Genre::from_str("Qawwali").unwrap(), Genre::Qawwali);
        assert!(Genre::from_str("Metal").is_err());
        assert!(Genre::from_str("pop").is_err());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = SongPatch {
            title: Some("New title".to_string()),
            artist: None,
            description: None,
            genre: None,
            duration: None,
            image_url: None,
            audio_url: None,
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["title"], "New title");
    }
}
