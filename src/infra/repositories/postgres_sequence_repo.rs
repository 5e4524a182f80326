use crate::domain::ports::SequenceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSequenceRepo {
    pool: PgPool,
}

impl PostgresSequenceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SequenceRepository for PostgresSequenceRepo {
    async fn next_for_year(&self, year: i32) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO year_sequences (year, last_sequence) VALUES ($1, 1) \
             ON CONFLICT (year) DO UPDATE SET last_sequence = year_sequences.last_sequence + 1 \
             RETURNING last_sequence"
        )
            .bind(year)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
