/// Per-user library types: playlists, favorites, history, my list
use crate::types::{AccountId, Identity, Music};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist identifier
pub type PlaylistId = i64;

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: AccountId,
    pub owner_username: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_public: bool,
    pub music_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Public playlists are visible to anyone; private ones to owner and admins
    pub fn is_visible_to(&self, viewer: Option<&Identity>) -> bool {
        self.is_public || viewer.is_some_and(|v| self.is_modifiable_by(v))
    }

    /// Only the owner or an admin may change a playlist
    pub fn is_modifiable_by(&self, identity: &Identity) -> bool {
        identity.is_admin || identity.id == self.owner_id
    }
}

#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub owner_id: AccountId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_public: Option<bool>,
}

/// A music item at a position within a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    pub position: i64,
    pub added_at: DateTime<Utc>,
    pub music: Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    UpdatedAt,
    CreatedAt,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Playlist ordering; unknown inputs fall back to newest-updated first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaylistSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl PlaylistSort {
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Self {
        let field = match field.map(str::trim) {
            Some("createdAt" | "created_at") => SortField::CreatedAt,
            Some("name") => SortField::Name,
            _ => SortField::UpdatedAt,
        };
        let direction = match direction {
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        Self { field, direction }
    }

    /// SQL `ORDER BY` fragment from a closed set of columns
    pub fn order_by(&self) -> &'static str {
        match (self.field, self.direction) {
            (SortField::UpdatedAt, SortDirection::Desc) => "p.updated_at DESC, p.id DESC",
            (SortField::UpdatedAt, SortDirection::Asc) => "p.updated_at ASC, p.id ASC",
            (SortField::CreatedAt, SortDirection::Desc) => "p.created_at DESC, p.id DESC",
            (SortField::CreatedAt, SortDirection::Asc) => "p.created_at ASC, p.id ASC",
            (SortField::Name, SortDirection::Desc) => "p.name COLLATE NOCASE DESC, p.id DESC",
            (SortField::Name, SortDirection::Asc) => "p.name COLLATE NOCASE ASC, p.id ASC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub music: Music,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub music: Music,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyListEntry {
    pub id: i64,
    pub music: Music,
    pub added_at: DateTime<Utc>,
}

/// Admin dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub normal_users: i64,
    pub verified_users: i64,
    pub total_music: i64,
    /// Tracks still visible to listeners
    pub active_music: i64,
    pub total_playlists: i64,
    pub total_categories: i64,
    pub total_artists: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(owner_id: AccountId, is_public: bool) -> Playlist {
        let now = Utc::now();
        Playlist {
            id: 1,
            owner_id,
            owner_username: "owner".to_string(),
            name: "Road trip".to_string(),
            description: None,
            image_url: None,
            is_public,
            music_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn identity(id: AccountId, is_admin: bool) -> Identity {
        Identity {
            id,
            username: format!("user{id}"),
            is_admin,
        }
    }

    #[test]
    fn test_private_playlist_visibility() {
        let p = playlist(1, false);
        assert!(!p.is_visible_to(None));
        assert!(!p.is_visible_to(Some(&identity(2, false))));
        assert!(p.is_visible_to(Some(&identity(1, false))));
        assert!(p.is_visible_to(Some(&identity(3, true))));
    }

    #[test]
    fn test_public_playlist_is_visible_but_not_modifiable() {
        let p = playlist(1, true);
        assert!(p.is_visible_to(None));
        assert!(!p.is_modifiable_by(&identity(2, false)));
        assert!(p.is_modifiable_by(&identity(2, true)));
    }

    #[test]
    fn test_sort_parse_falls_back_to_default() {
        assert_eq!(PlaylistSort::parse(None, None), PlaylistSort::default());
        assert_eq!(
            PlaylistSort::parse(Some("id; DROP TABLE playlists"), Some("sideways")),
            PlaylistSort::default()
        );

        let sort = PlaylistSort::parse(Some("name"), Some("ASC"));
        assert_eq!(sort.field, SortField::Name);
        assert_eq!(sort.direction, SortDirection::Asc);
        assert_eq!(sort.order_by(), "p.name COLLATE NOCASE ASC, p.id ASC");
    }
}
