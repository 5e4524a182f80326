use crate::domain::models::{
    guest::{Guest, GuestQuery},
    checkin::{CheckinRecord, CheckinFilter, CheckinHistoryEntry},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Guest>, AppError>;
    async fn find_by_display_id(&self, display_id: i64) -> Result<Option<Guest>, AppError>;
    async fn update(&self, guest: &Guest) -> Result<Guest, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count(&self, query: &GuestQuery) -> Result<i64, AppError>;
    /// Newest first.
    async fn search(&self, query: &GuestQuery, limit: i64, offset: i64) -> Result<Vec<Guest>, AppError>;
}

#[async_trait]
pub trait CheckinRepository: Send + Sync {
    async fn create(&self, record: &CheckinRecord) -> Result<CheckinRecord, AppError>;
    async fn find_active_by_guest(&self, guest_id: &str) -> Result<Option<CheckinRecord>, AppError>;
    async fn list_active_by_guests(&self, guest_ids: &[String]) -> Result<Vec<CheckinRecord>, AppError>;
    async fn count_by_guests(&self, guest_ids: &[String]) -> Result<Vec<(String, i64)>, AppError>;
    async fn last_checkout_by_guests(&self, guest_ids: &[String]) -> Result<Vec<(String, DateTime<Utc>)>, AppError>;
    async fn close(&self, record: &CheckinRecord) -> Result<CheckinRecord, AppError>;
    async fn list(&self, filter: &CheckinFilter) -> Result<Vec<CheckinHistoryEntry>, AppError>;
}

/// Per-year counter backing display-id allocation.
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Atomically increments and returns the counter for `year`, starting at 1.
    async fn next_for_year(&self, year: i32) -> Result<i32, AppError>;
}
