//! Integration tests for categories, artists and music
//!
//! Tests:
//! - Unique names surface as Conflict
//! - Partial updates and soft deactivation
//! - Music filters, joins, pagination and play counts
//! - Per-artist music and play totals

mod test_helpers;

use cadence_core::types::*;
use cadence_core::CadenceError;
use cadence_storage::{artists, categories, music};
use test_helpers::*;

#[tokio::test]
async fn test_category_crud() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let rock = create_test_category(pool, "Rock").await;
    create_test_category(pool, "Ambient").await;

    let err = categories::create(
        pool,
        NewCategory {
            name: "Rock".to_string(),
            description: None,
            image_url: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CadenceError::Conflict(_)));

    let updated = categories::update(
        pool,
        rock.id,
        UpdateCategory {
            description: Some("Loud".to_string()),
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Rock");
    assert_eq!(updated.description.as_deref(), Some("Loud"));
    assert!(!updated.is_active);

    let active = categories::get_active(pool).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Ambient");
    assert_eq!(categories::get_all(pool).await.unwrap().len(), 2);

    categories::delete(pool, rock.id).await.unwrap();
    assert!(categories::get_by_id(pool, rock.id).await.unwrap().is_none());
    assert!(matches!(
        categories::delete(pool, rock.id).await.unwrap_err(),
        CadenceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_artist_search_and_pagination() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    for name in ["Boards of Canada", "Bonobo", "Tycho"] {
        create_test_artist(pool, name).await;
    }

    let page = artists::list(pool, Some("bo"), true, PageRequest::new(0, 1))
        .await
        .unwrap();
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].name, "Boards of Canada");

    let all = artists::list(pool, None, true, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total_elements, 3);
}

#[tokio::test]
async fn test_music_includes_category_and_artist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let category = create_test_category(pool, "Electronic").await;
    let artist = create_test_artist(pool, "Tycho").await;
    let song = create_test_music(pool, "Awake", Some(category.id), Some(artist.id)).await;

    assert_eq!(song.music_type, MusicType::Song);
    assert_eq!(song.category.as_ref().map(|c| c.name.as_str()), Some("Electronic"));
    assert_eq!(song.artist.as_ref().map(|a| a.id), Some(artist.id));
    assert_eq!(song.play_count, 0);

    // Deleting the artist detaches it instead of deleting the music
    artists::delete(pool, artist.id).await.unwrap();
    let song = music::get_by_id(pool, song.id).await.unwrap().unwrap();
    assert!(song.artist.is_none());
}

#[tokio::test]
async fn test_music_with_unknown_artist_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = music::create(
        pool,
        NewMusic {
            title: "Orphan".to_string(),
            duration_seconds: 60,
            file_url: "/uploads/orphan.mp3".to_string(),
            image_url: None,
            music_type: MusicType::Song,
            category_id: None,
            artist_id: Some(999),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CadenceError::NotFound(_)));
}

#[tokio::test]
async fn test_music_filters() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let jazz = create_test_category(pool, "Jazz").await;
    let miles = create_test_artist(pool, "Miles Davis").await;
    create_test_music(pool, "So What", Some(jazz.id), Some(miles.id)).await;
    create_test_music(pool, "Blue in Green", Some(jazz.id), Some(miles.id)).await;
    let hidden = create_test_music(pool, "Freddie Freeloader", Some(jazz.id), None).await;
    create_test_music(pool, "Unrelated", None, None).await;

    music::update(
        pool,
        hidden.id,
        UpdateMusic {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let by_category = MusicFilter {
        category_id: Some(jazz.id),
        ..Default::default()
    };
    let active = music::list(pool, &by_category, PageRequest::default(), true)
        .await
        .unwrap();
    assert_eq!(active.total_elements, 2);

    let everything = music::list(pool, &by_category, PageRequest::default(), false)
        .await
        .unwrap();
    assert_eq!(everything.total_elements, 3);

    // Search matches titles and artist names
    let by_artist_name = MusicFilter {
        search: Some("miles".to_string()),
        ..Default::default()
    };
    let found = music::list(pool, &by_artist_name, PageRequest::default(), true)
        .await
        .unwrap();
    assert_eq!(found.total_elements, 2);

    let by_title = MusicFilter {
        search: Some("green".to_string()),
        artist_id: Some(miles.id),
        ..Default::default()
    };
    let found = music::list(pool, &by_title, PageRequest::default(), true)
        .await
        .unwrap();
    assert_eq!(found.content.len(), 1);
    assert_eq!(found.content[0].title, "Blue in Green");
}

#[tokio::test]
async fn test_play_count_and_trending() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let quiet = create_test_music(pool, "Quiet", None, None).await;
    let hit = create_test_music(pool, "Hit", None, None).await;

    for _ in 0..3 {
        music::increment_play_count(pool, hit.id).await.unwrap();
    }
    assert_eq!(music::increment_play_count(pool, quiet.id).await.unwrap(), 1);

    let trending = music::trending(pool, 10).await.unwrap();
    assert_eq!(trending[0].id, hit.id);
    assert_eq!(trending[0].play_count, 3);

    assert!(matches!(
        music::increment_play_count(pool, 999).await.unwrap_err(),
        CadenceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_artist_stats_count_inactive_music() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let robyn = create_test_artist(pool, "Robyn").await;
    let other = create_test_artist(pool, "Lykke Li").await;
    let hit = create_test_music(pool, "Hang With Me", None, Some(robyn.id)).await;
    let retired = create_test_music(pool, "Be Mine", None, Some(robyn.id)).await;
    create_test_music(pool, "I Follow Rivers", None, Some(other.id)).await;

    music::increment_play_count(pool, hit.id).await.unwrap();
    music::increment_play_count(pool, hit.id).await.unwrap();
    music::increment_play_count(pool, retired.id).await.unwrap();
    music::update(
        pool,
        retired.id,
        UpdateMusic {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let stats = music::artist_stats(pool, robyn.id).await.unwrap();
    assert_eq!(
        stats,
        ArtistStats {
            artist_id: robyn.id,
            music_count: 2,
            total_plays: 3,
        }
    );

    let empty = create_test_artist(pool, "Silent").await;
    let stats = music::artist_stats(pool, empty.id).await.unwrap();
    assert_eq!(stats.music_count, 0);
    assert_eq!(stats.total_plays, 0);
}
