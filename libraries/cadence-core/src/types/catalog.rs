/// Catalog domain types: categories, artists, music
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category identifier
pub type CategoryId = i64;

/// Artist identifier
pub type ArtistId = i64;

/// Music identifier
pub type MusicId = i64;

/// Music category (genre-like grouping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Catalog totals for one artist, inactive music included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistStats {
    pub artist_id: ArtistId,
    pub music_count: i64,
    pub total_plays: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtist {
    pub name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtist {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Kind of audio content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicType {
    #[default]
    Song,
    Podcast,
    Instrumental,
}

impl MusicType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicType::Song => "song",
            MusicType::Podcast => "podcast",
            MusicType::Instrumental => "instrumental",
        }
    }
}

impl fmt::Display for MusicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MusicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "song" => Ok(MusicType::Song),
            "podcast" => Ok(MusicType::Podcast),
            "instrumental" => Ok(MusicType::Instrumental),
            other => Err(format!("unknown music type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub id: ArtistId,
    pub name: String,
}

/// A playable catalog item with its category and artist inlined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Music {
    pub id: MusicId,
    pub title: String,
    pub duration_seconds: i64,
    pub file_url: String,
    pub image_url: Option<String>,
    pub music_type: MusicType,
    pub category: Option<CategorySummary>,
    pub artist: Option<ArtistSummary>,
    pub play_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMusic {
    pub title: String,
    #[serde(default)]
    pub duration_seconds: i64,
    pub file_url: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub music_type: MusicType,
    pub category_id: Option<CategoryId>,
    pub artist_id: Option<ArtistId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMusic {
    pub title: Option<String>,
    pub duration_seconds: Option<i64>,
    pub file_url: Option<String>,
    pub image_url: Option<String>,
    pub music_type: Option<MusicType>,
    pub category_id: Option<CategoryId>,
    pub artist_id: Option<ArtistId>,
    pub is_active: Option<bool>,
}

/// Filters for music listings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicFilter {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub artist_id: Option<ArtistId>,
}
