//! Integration tests for playlists and the per-user library
//!
//! Tests:
//! - Playlist visibility in listings and sorting
//! - Admin listing across owners
//! - Contiguous 0-based positions across add/remove
//! - Favorites / my list uniqueness, history append-only
//! - Dashboard counters

mod test_helpers;

use cadence_core::types::*;
use cadence_core::CadenceError;
use cadence_storage::{favorites, history, my_list, playlists, stats};
use test_helpers::*;

#[tokio::test]
async fn test_public_listing_hides_private_playlists() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    create_test_playlist(pool, "Chill Mix", alice.id, true).await;
    create_test_playlist(pool, "Secret", alice.id, false).await;
    create_test_playlist(pool, "Workout", alice.id, true).await;

    let sort = PlaylistSort::parse(Some("name"), Some("asc"));
    let public = playlists::list_public(pool, None, sort, PageRequest::default())
        .await
        .unwrap();
    let names: Vec<_> = public.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Chill Mix", "Workout"]);
    assert_eq!(public.content[0].owner_username, "alice");

    let searched = playlists::list_public(pool, Some("work"), sort, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(searched.total_elements, 1);

    let mine = playlists::list_by_owner(pool, alice.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(mine.total_elements, 3);
}

#[tokio::test]
async fn test_list_all_includes_every_owner_and_private() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let bob = create_test_account(pool, "bob").await;
    create_test_playlist(pool, "Chill Mix", alice.id, true).await;
    create_test_playlist(pool, "Secret", alice.id, false).await;
    create_test_playlist(pool, "Bob's Private Mix", bob.id, false).await;

    let all = playlists::list_all(pool, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total_elements, 3);
    assert!(all.content.iter().any(|p| p.owner_username == "bob" && !p.is_public));

    let searched = playlists::list_all(pool, Some("mix"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(searched.total_elements, 2);
}

#[tokio::test]
async fn test_playlist_positions_stay_contiguous() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Road Trip", alice.id, false).await;

    let mut ids = Vec::new();
    for title in ["One", "Two", "Three"] {
        let song = create_test_music(pool, title, None, None).await;
        let entry = playlists::add_music(pool, playlist.id, song.id).await.unwrap();
        assert_eq!(entry.position, ids.len() as i64);
        ids.push(song.id);
    }

    let err = playlists::add_music(pool, playlist.id, ids[0]).await.unwrap_err();
    assert!(matches!(err, CadenceError::Conflict(_)));

    playlists::remove_music(pool, playlist.id, ids[0]).await.unwrap();

    let entries = playlists::entries(pool, playlist.id).await.unwrap();
    let layout: Vec<_> = entries.iter().map(|e| (e.position, e.music.id)).collect();
    assert_eq!(layout, vec![(0, ids[1]), (1, ids[2])]);

    let refreshed = playlists::get_by_id(pool, playlist.id).await.unwrap().unwrap();
    assert_eq!(refreshed.music_count, 2);

    let err = playlists::remove_music(pool, playlist.id, ids[0]).await.unwrap_err();
    assert!(matches!(err, CadenceError::NotFound(_)));
}

#[tokio::test]
async fn test_add_unknown_music_or_playlist_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Empty", alice.id, true).await;
    let song = create_test_music(pool, "Real", None, None).await;

    assert!(matches!(
        playlists::add_music(pool, playlist.id, 999).await.unwrap_err(),
        CadenceError::NotFound(_)
    ));
    assert!(matches!(
        playlists::add_music(pool, 999, song.id).await.unwrap_err(),
        CadenceError::NotFound(_)
    ));
    assert!(playlists::entries(pool, playlist.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Draft", alice.id, false).await;

    let updated = playlists::update(
        pool,
        playlist.id,
        UpdatePlaylist {
            name: Some("Final".to_string()),
            is_public: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Final");
    assert!(updated.is_public);

    playlists::delete(pool, playlist.id).await.unwrap();
    assert!(playlists::get_by_id(pool, playlist.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_favorites_are_unique_per_account() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let bob = create_test_account(pool, "bob").await;
    let song = create_test_music(pool, "Song", None, None).await;

    favorites::add(pool, alice.id, song.id).await.unwrap();
    assert!(matches!(
        favorites::add(pool, alice.id, song.id).await.unwrap_err(),
        CadenceError::Conflict(_)
    ));
    favorites::add(pool, bob.id, song.id).await.unwrap();

    assert!(favorites::exists(pool, alice.id, song.id).await.unwrap());
    let page = favorites::list(pool, alice.id, PageRequest::default()).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].music.title, "Song");

    favorites::remove(pool, alice.id, song.id).await.unwrap();
    assert!(!favorites::exists(pool, alice.id, song.id).await.unwrap());
    assert!(favorites::exists(pool, bob.id, song.id).await.unwrap());
    assert!(matches!(
        favorites::remove(pool, alice.id, song.id).await.unwrap_err(),
        CadenceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_history_appends_and_my_list_is_unique() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let song = create_test_music(pool, "Loop", None, None).await;

    history::record(pool, alice.id, song.id).await.unwrap();
    history::record(pool, alice.id, song.id).await.unwrap();
    let plays = history::list(pool, alice.id, PageRequest::default()).await.unwrap();
    assert_eq!(plays.total_elements, 2);
    assert!(plays.content[0].id > plays.content[1].id);

    my_list::add(pool, alice.id, song.id).await.unwrap();
    assert!(matches!(
        my_list::add(pool, alice.id, song.id).await.unwrap_err(),
        CadenceError::Conflict(_)
    ));
    assert_eq!(my_list::list(pool, alice.id).await.unwrap().len(), 1);

    my_list::remove(pool, alice.id, song.id).await.unwrap();
    assert!(!my_list::exists(pool, alice.id, song.id).await.unwrap());
    assert!(matches!(
        my_list::add(pool, alice.id, 999).await.unwrap_err(),
        CadenceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_account(pool, "alice").await;
    let bob = create_test_account(pool, "bob").await;
    cadence_storage::accounts::set_admin(pool, bob.id, true).await.unwrap();
    create_test_category(pool, "Pop").await;
    create_test_artist(pool, "Robyn").await;
    create_test_music(pool, "Dancing On My Own", None, None).await;
    let retired = create_test_music(pool, "Hang With Me", None, None).await;
    cadence_storage::music::update(
        pool,
        retired.id,
        UpdateMusic {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    create_test_playlist(pool, "Mix", alice.id, true).await;

    let counts = stats::dashboard(pool).await.unwrap();
    assert_eq!(
        counts,
        DashboardStats {
            total_users: 2,
            normal_users: 1,
            verified_users: 2,
            total_music: 2,
            active_music: 1,
            total_playlists: 1,
            total_categories: 1,
            total_artists: 1,
        }
    );
}
