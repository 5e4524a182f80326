mod common;

use common::TestApp;
use guest_checkin::domain::models::guest::NewGuest;
use std::collections::HashSet;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_get_distinct_display_ids() {
    let app = TestApp::new().await;
    let registrations = 30;

    let mut set = JoinSet::new();
    for i in 0..registrations {
        let service = app.state.guest_service.clone();
        set.spawn(async move {
            service
                .create_guest(NewGuest { name: format!("Walk-in {}", i), contact: None })
                .await
        });
    }

    let mut display_ids = Vec::new();
    while let Some(res) = set.join_next().await {
        let guest = res.unwrap().expect("Registration failed under contention");
        display_ids.push(guest.display_id);
    }

    let unique: HashSet<i64> = display_ids.iter().copied().collect();
    assert_eq!(display_ids.len(), registrations);
    assert_eq!(unique.len(), registrations, "Display id handed out twice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkins_open_one_visit() {
    let app = TestApp::new().await;
    let guest = app.register("Rush").await;

    let mut set = JoinSet::new();
    for _ in 0..10 {
        let service = app.state.checkin_service.clone();
        let guest_id = guest.id.clone();
        set.spawn(async move { service.check_in(&guest_id).await });
    }

    let mut opened = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(_) => opened += 1,
            Err(err) => assert!(
                matches!(err.code(), "ALREADY_CHECKED_IN" | "CONFLICT"),
                "unexpected error: {}",
                err
            ),
        }
    }
    assert_eq!(opened, 1);

    let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checkin_records WHERE guest_id = ? AND is_active = 1")
        .bind(&guest.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(active, 1);
}
