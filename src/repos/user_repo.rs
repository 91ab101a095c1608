/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - SqlitePool を受け取り insert / fetch-by-email を提供
 * - DB エラーは RepoError に変換して返す (unique 違反は Conflict)
 */
use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};

use crate::repos::error::RepoError;

// Never derives Serialize: the password hash must not leave the process.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

pub async fn insert(db: &SqlitePool, email: &str, password_hash: &str) -> Result<i64, RepoError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES (?, ?)
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(id)
}

pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<UserRow>, RepoError> {
    // Email match is exact (no normalization), enforced by the UNIQUE column.
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        crate::db::init_schema(&pool).await.expect("schema");
        pool
    }

    #[tokio::test]
    async fn insert_then_find_by_email() {
        let pool = test_pool().await;

        let id = insert(&pool, "a@x.com", "digest").await.unwrap();
        assert!(id > 0);

        let row = find_by_email(&pool, "a@x.com").await.unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.email, "a@x.com");
        assert_eq!(row.password_hash, "digest");
    }

    #[tokio::test]
    async fn find_unknown_email_is_none() {
        let pool = test_pool().await;
        let row = find_by_email(&pool, "nobody@x.com").await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let pool = test_pool().await;

        insert(&pool, "a@x.com", "digest").await.unwrap();
        let err = insert(&pool, "a@x.com", "other-digest").await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let pool = test_pool().await;

        insert(&pool, "a@x.com", "digest").await.unwrap();
        let row = find_by_email(&pool, "A@X.COM").await.unwrap();
        assert!(row.is_none());
    }
}
