use guest_checkin::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::{
        factory::run_sqlite_migrations,
        repositories::{
            sqlite_guest_repo::SqliteGuestRepo,
            sqlite_checkin_repo::SqliteCheckinRepo,
            sqlite_sequence_repo::SqliteSequenceRepo,
        },
    },
    domain::models::guest::{Guest, NewGuest},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_TOKEN: &str = "test-admin-token";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            admin_token: ADMIN_TOKEN.to_string(),
            log_dir: "./logs".to_string(),
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteGuestRepo::new(pool.clone())),
            Arc::new(SqliteCheckinRepo::new(pool.clone())),
            Arc::new(SqliteSequenceRepo::new(pool.clone())),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn register(&self, name: &str) -> Guest {
        self.state.guest_service
            .create_guest(NewGuest { name: name.to_string(), contact: None })
            .await
            .expect("registration failed")
    }

    /// Inserts a guest with a fixed display id, bypassing the allocator.
    pub async fn insert_with_display_id(&self, name: &str, display_id: i64) -> Guest {
        let guest = Guest::new(display_id, name.to_string(), None);
        self.state.guest_repo.create(&guest).await.expect("insert failed")
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, admin: bool) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if admin {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
