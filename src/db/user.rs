use sqlx::sqlite::SqlitePool;

use crate::store::{NewUser, StoreError, User, UserStore, UserUpdate};

/// SQLite-backed [`UserStore`].
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    role: String,
    status: i32,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role,
            status: row.status != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

macro_rules! select_user {
    ($tail:literal) => {
        concat!(
            "SELECT id, email, password_hash, first_name, last_name, role, status, created_at, updated_at FROM users ",
            $tail
        )
    };
}

/// Unique-constraint violations become `Conflict`, everything else is a backend error.
fn write_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Backend(e),
    }
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(select_user!("WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }
}

impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(select_user!("WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.fetch_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(select_user!("ORDER BY created_at, email"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, data: NewUser) -> Result<User, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.role)
        .bind(data.status)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        self.fetch_by_id(&id).await?.ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &str, data: UserUpdate) -> Result<User, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET
                email = COALESCE(?, email),
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                status = COALESCE(?, status),
                updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.status)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.fetch_by_id(id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
