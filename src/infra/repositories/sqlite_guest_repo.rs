use crate::domain::{models::guest::{fold_name, Guest, GuestQuery}, ports::GuestRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteGuestRepo {
    pool: SqlitePool,
}

impl SqliteGuestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, query: &GuestQuery) {
    match query {
        GuestQuery::Any => {}
        GuestQuery::Nothing => {
            qb.push(" WHERE 1 = 0");
        }
        GuestQuery::DisplayId(display_id) => {
            qb.push(" WHERE display_id = ").push_bind(*display_id);
        }
        GuestQuery::NameContains(needle) => {
            qb.push(" WHERE search_name LIKE ")
                .push_bind(GuestQuery::like_pattern(needle))
                .push(" ESCAPE '\\'");
        }
    }
}

#[async_trait]
impl GuestRepository for SqliteGuestRepo {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "INSERT INTO guests (id, display_id, name, search_name, contact, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id, display_id, name, contact, created_at"
        )
            .bind(&guest.id)
            .bind(guest.display_id)
            .bind(&guest.name)
            .bind(fold_name(&guest.name))
            .bind(&guest.contact)
            .bind(guest.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT id, display_id, name, contact, created_at FROM guests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT id, display_id, name, contact, created_at FROM guests WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_display_id(&self, display_id: i64) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT id, display_id, name, contact, created_at FROM guests WHERE display_id = ?")
            .bind(display_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "UPDATE guests SET name=?, search_name=?, contact=? WHERE id=? RETURNING id, display_id, name, contact, created_at"
        )
            .bind(&guest.name)
            .bind(fold_name(&guest.name))
            .bind(&guest.contact)
            .bind(&guest.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::GuestNotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::GuestNotFound);
        }
        Ok(())
    }

    async fn count(&self, query: &GuestQuery) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM guests");
        push_filter(&mut qb, query);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn search(&self, query: &GuestQuery, limit: i64, offset: i64) -> Result<Vec<Guest>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, display_id, name, contact, created_at FROM guests");
        push_filter(&mut qb, query);
        qb.push(" ORDER BY created_at DESC, display_id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        qb.build_query_as::<Guest>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
