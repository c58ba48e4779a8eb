//! Postgres-backed [`UserStore`].

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::models::{NewUser, Role, User, UserPatch};
use super::UserStore;
use crate::error::{Error, Result};

const COLUMNS: &str = "id, name, email, password_hash, role, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(r: UserRow) -> Result<Self> {
        let role: Role = r.role.parse().map_err(|e: String| anyhow!(e))?;
        Ok(User {
            id: r.id,
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            role,
            created_at: r.created_at,
        })
    }
}

/// Map a unique violation on `users.email` to [`Error::DuplicateEmail`].
fn map_write_err(e: sqlx::Error, what: &'static str) -> Error {
    match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Error::DuplicateEmail
        }
        _ => Error::Internal(anyhow::Error::new(e).context(what)),
    }
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .context("fetching user by email")?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("fetching user by id")?
            .map(User::try_from)
            .transpose()
    }

    async fn insert(&self, new: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_err(e, "inserting user"))?;

        row.try_into()
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users
                SET name  = COALESCE($2, name),
                    email = COALESCE($3, email),
                    role  = COALESCE($4, role)
              WHERE id = $1
          RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.role.map(|r| r.as_str()))
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_err(e, "updating user"))?
        .ok_or(Error::NotFound("User"))?;

        row.try_into()
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<()> {
        let rows = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await
            .context("updating password")?
            .rows_affected();

        if rows == 0 {
            Err(Error::NotFound("User"))
        } else {
            Ok(())
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let rows = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("deleting user")?
            .rows_affected();

        if rows == 0 {
            Err(Error::NotFound("User"))
        } else {
            Ok(())
        }
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at, seq"
        ))
        .fetch_all(&self.db)
        .await
        .context("listing users")?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.db)
            .await
            .context("database unreachable")?;
        Ok(())
    }
}
