use std::collections::HashSet;
use crate::domain::{
    models::{checkin::{CheckinFilter, CheckinHistoryEntry, CheckinRecord}, guest::GuestQuery},
    ports::CheckinRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteCheckinRepo {
    pool: SqlitePool,
}

impl SqliteCheckinRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_guest_ids(qb: &mut QueryBuilder<'_, Sqlite>, guest_ids: &[String]) {
    qb.push("guest_id IN (");
    let mut separated = qb.separated(", ");
    for id in guest_ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
}

#[async_trait]
impl CheckinRepository for SqliteCheckinRepo {
    async fn create(&self, record: &CheckinRecord) -> Result<CheckinRecord, AppError> {
        sqlx::query_as::<_, CheckinRecord>(
            "INSERT INTO checkin_records (id, guest_id, checkin_at, checkout_at, is_active) VALUES (?, ?, ?, ?, ?) RETURNING id, guest_id, checkin_at, checkout_at, is_active"
        )
            .bind(&record.id)
            .bind(&record.guest_id)
            .bind(record.checkin_at)
            .bind(record.checkout_at)
            .bind(record.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active_by_guest(&self, guest_id: &str) -> Result<Option<CheckinRecord>, AppError> {
        sqlx::query_as::<_, CheckinRecord>(
            "SELECT id, guest_id, checkin_at, checkout_at, is_active FROM checkin_records WHERE guest_id = ? AND is_active = 1 LIMIT 1"
        )
            .bind(guest_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_by_guests(&self, guest_ids: &[String]) -> Result<Vec<CheckinRecord>, AppError> {
        if guest_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, guest_id, checkin_at, checkout_at, is_active FROM checkin_records WHERE is_active = 1 AND "
        );
        push_guest_ids(&mut qb, guest_ids);

        qb.build_query_as::<CheckinRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_guests(&self, guest_ids: &[String]) -> Result<Vec<(String, i64)>, AppError> {
        if guest_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT guest_id, COUNT(*) FROM checkin_records WHERE ");
        push_guest_ids(&mut qb, guest_ids);
        qb.push(" GROUP BY guest_id");

        qb.build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn last_checkout_by_guests(&self, guest_ids: &[String]) -> Result<Vec<(String, DateTime<Utc>)>, AppError> {
        if guest_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT guest_id, checkout_at FROM checkin_records WHERE checkout_at IS NOT NULL AND "
        );
        push_guest_ids(&mut qb, guest_ids);
        qb.push(" ORDER BY checkout_at DESC");

        let rows = qb.build_query_as::<(String, DateTime<Utc>)>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        // Rows arrive newest first; keep the first per guest.
        let mut seen = HashSet::new();
        Ok(rows.into_iter().filter(|(guest_id, _)| seen.insert(guest_id.clone())).collect())
    }

    async fn close(&self, record: &CheckinRecord) -> Result<CheckinRecord, AppError> {
        sqlx::query_as::<_, CheckinRecord>(
            "UPDATE checkin_records SET checkout_at=?, is_active=? WHERE id=? RETURNING id, guest_id, checkin_at, checkout_at, is_active"
        )
            .bind(record.checkout_at)
            .bind(record.is_active)
            .bind(&record.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &CheckinFilter) -> Result<Vec<CheckinHistoryEntry>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT c.id, c.guest_id, g.name AS guest_name, g.display_id AS guest_display_id, \
             c.checkin_at, c.checkout_at, c.is_active \
             FROM checkin_records c JOIN guests g ON g.id = c.guest_id WHERE 1 = 1"
        );

        if let Some(from) = filter.from_instant() {
            qb.push(" AND c.checkin_at >= ").push_bind(from);
        }
        if let Some(until) = filter.until_instant() {
            qb.push(" AND c.checkin_at < ").push_bind(until);
        }
        if let Some(name) = filter.guest_name.as_deref().filter(|n| !n.is_empty()) {
            qb.push(" AND g.search_name LIKE ")
                .push_bind(GuestQuery::like_pattern(name))
                .push(" ESCAPE '\\'");
        }
        qb.push(" ORDER BY c.checkin_at DESC");

        qb.build_query_as::<CheckinHistoryEntry>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
