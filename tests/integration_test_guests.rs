mod common;

use chrono::{Datelike, Utc};
use common::TestApp;
use guest_checkin::{
    domain::{
        models::guest::{GuestChanges, NewGuest},
        services::display_id,
    },
    error::AppError,
};
use std::collections::HashSet;

async fn seed_sequence(app: &TestApp, last_sequence: i32) {
    sqlx::query("INSERT INTO year_sequences (year, last_sequence) VALUES (?, ?)")
        .bind(Utc::now().year())
        .bind(last_sequence)
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_distinct_names_get_unique_display_ids() {
    let app = TestApp::new().await;
    let year = Utc::now().year();

    let mut ids = HashSet::new();
    for i in 1..=25 {
        let guest = app.register(&format!("Guest {}", i)).await;
        assert_eq!(guest.display_id, display_id::compose(year, i));
        assert!(ids.insert(guest.display_id), "display id reused");
    }
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let app = TestApp::new().await;
    app.register("Anna").await;

    let err = app.state.guest_service
        .create_guest(NewGuest { name: "Anna".into(), contact: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateGuest));

    // Uniqueness is an exact match.
    let other = app.state.guest_service
        .create_guest(NewGuest { name: "anna".into(), contact: None })
        .await;
    assert!(other.is_ok());
}

#[tokio::test]
async fn test_empty_contact_is_stored_as_null() {
    let app = TestApp::new().await;

    let guest = app.state.guest_service
        .create_guest(NewGuest { name: "Ben".into(), contact: Some(String::new()) })
        .await
        .unwrap();
    assert_eq!(guest.contact, None);

    let guest = app.state.guest_service
        .create_guest(NewGuest { name: "Cleo".into(), contact: Some("cleo@example.com".into()) })
        .await
        .unwrap();
    assert_eq!(guest.contact.as_deref(), Some("cleo@example.com"));
}

#[tokio::test]
async fn test_sequence_limit_per_year() {
    let app = TestApp::new().await;
    seed_sequence(&app, 998).await;

    let last = app.register("Number 999").await;
    assert_eq!(last.display_id, display_id::compose(Utc::now().year(), 999));

    let err = app.state.guest_service
        .create_guest(NewGuest { name: "Number 1000".into(), contact: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SequenceLimitExceeded));
}

#[tokio::test]
async fn test_display_id_collision_is_reported() {
    let app = TestApp::new().await;

    // Occupy the id the allocator will hand out next.
    app.insert_with_display_id("Squatter", display_id::compose(Utc::now().year(), 1)).await;

    let err = app.state.guest_service
        .create_guest(NewGuest { name: "Newcomer".into(), contact: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DisplayIdGenerationFailed));

    // The counter moved on, so the next registration succeeds.
    let guest = app.register("Newcomer").await;
    assert_eq!(guest.display_id, display_id::compose(Utc::now().year(), 2));
}

#[tokio::test]
async fn test_get_guest_by_id() {
    let app = TestApp::new().await;
    let guest = app.register("Dora").await;

    let found = app.state.guest_service.get_guest_by_id(&guest.id).await.unwrap().unwrap();
    assert_eq!(found.guest, guest);
    assert!(!found.is_currently_checked_in);
    assert!(found.current_checkin_id.is_none());
    assert!(found.last_checkin_at.is_none());

    let checkin = app.state.checkin_service.check_in(&guest.id).await.unwrap();
    let found = app.state.guest_service.get_guest_by_id(&guest.id).await.unwrap().unwrap();
    assert!(found.is_currently_checked_in);
    assert_eq!(found.current_checkin_id.as_deref(), Some(checkin.id.as_str()));
    assert_eq!(found.last_checkin_at, Some(checkin.checkin_at));

    let missing = app.state.guest_service.get_guest_by_id("no-such-guest").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_partial_updates() {
    let app = TestApp::new().await;
    let guest = app.state.guest_service
        .create_guest(NewGuest { name: "Emil".into(), contact: Some("emil@example.com".into()) })
        .await
        .unwrap();

    // Contact only.
    let updated = app.state.guest_service
        .update_guest(&guest.id, GuestChanges { name: None, contact: Some("new@example.com".into()) })
        .await
        .unwrap();
    assert_eq!(updated.name, "Emil");
    assert_eq!(updated.contact.as_deref(), Some("new@example.com"));

    // Name only.
    let updated = app.state.guest_service
        .update_guest(&guest.id, GuestChanges { name: Some("Emilia".into()), contact: None })
        .await
        .unwrap();
    assert_eq!(updated.name, "Emilia");
    assert_eq!(updated.contact.as_deref(), Some("new@example.com"));

    // Empty contact clears it.
    let updated = app.state.guest_service
        .update_guest(&guest.id, GuestChanges { name: None, contact: Some(String::new()) })
        .await
        .unwrap();
    assert_eq!(updated.contact, None);

    assert_eq!(updated.display_id, guest.display_id);
    assert_eq!(updated.created_at, guest.created_at);
}

#[tokio::test]
async fn test_rename_conflicts() {
    let app = TestApp::new().await;
    let fay = app.register("Fay").await;
    app.register("Gus").await;

    let err = app.state.guest_service
        .update_guest(&fay.id, GuestChanges { name: Some("Gus".into()), contact: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateGuest));

    // Renaming to the current name is a no-op, not a conflict.
    let same = app.state.guest_service
        .update_guest(&fay.id, GuestChanges { name: Some("Fay".into()), contact: None })
        .await
        .unwrap();
    assert_eq!(same.name, "Fay");

    let err = app.state.guest_service
        .update_guest("no-such-guest", GuestChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::GuestNotFound));
}

#[tokio::test]
async fn test_delete_guest() {
    let app = TestApp::new().await;
    let guest = app.register("Hugo").await;

    app.state.guest_service.delete_guest(&guest.id).await.unwrap();
    assert!(app.state.guest_service.get_guest_by_id(&guest.id).await.unwrap().is_none());

    let err = app.state.guest_service.delete_guest(&guest.id).await.unwrap_err();
    assert!(matches!(err, AppError::GuestNotFound));

    // The name is free again.
    app.register("Hugo").await;
}
