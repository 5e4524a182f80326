use crate::domain::{
    models::{checkin::{CheckinFilter, CheckinHistoryEntry, CheckinRecord}, guest::GuestQuery},
    ports::CheckinRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

pub struct PostgresCheckinRepo {
    pool: PgPool,
}

impl PostgresCheckinRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinRepository for PostgresCheckinRepo {
    async fn create(&self, record: &CheckinRecord) -> Result<CheckinRecord, AppError> {
        sqlx::query_as::<_, CheckinRecord>(
            "INSERT INTO checkin_records (id, guest_id, checkin_at, checkout_at, is_active) VALUES ($1, $2, $3, $4, $5) RETURNING id, guest_id, checkin_at, checkout_at, is_active"
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
            "SELECT id, guest_id, checkin_at, checkout_at, is_active FROM checkin_records WHERE guest_id = $1 AND is_active LIMIT 1"
        )
            .bind(guest_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_by_guests(&self, guest_ids: &[String]) -> Result<Vec<CheckinRecord>, AppError> {
        sqlx::query_as::<_, CheckinRecord>(
            "SELECT id, guest_id, checkin_at, checkout_at, is_active FROM checkin_records WHERE is_active AND guest_id = ANY($1)"
        )
            .bind(guest_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_guests(&self, guest_ids: &[String]) -> Result<Vec<(String, i64)>, AppError> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT guest_id, COUNT(*) FROM checkin_records WHERE guest_id = ANY($1) GROUP BY guest_id"
        )
            .bind(guest_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn last_checkout_by_guests(&self, guest_ids: &[String]) -> Result<Vec<(String, DateTime<Utc>)>, AppError> {
        sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT DISTINCT ON (guest_id) guest_id, checkout_at FROM checkin_records \
             WHERE checkout_at IS NOT NULL AND guest_id = ANY($1) \
             ORDER BY guest_id, checkout_at DESC"
        )
            .bind(guest_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn close(&self, record: &CheckinRecord) -> Result<CheckinRecord, AppError> {
        sqlx::query_as::<_, CheckinRecord>(
            "UPDATE checkin_records SET checkout_at=$1, is_active=$2 WHERE id=$3 RETURNING id, guest_id, checkin_at, checkout_at, is_active"
        )
            .bind(record.checkout_at)
            .bind(record.is_active)
            .bind(&record.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &CheckinFilter) -> Result<Vec<CheckinHistoryEntry>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT c.id, c.guest_id, g.name AS guest_name, g.display_id AS guest_display_id, \
             c.checkin_at, c.checkout_at, c.is_active \
             FROM checkin_records c JOIN guests g ON g.id = c.guest_id WHERE TRUE"
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
