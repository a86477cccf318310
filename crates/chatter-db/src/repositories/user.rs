//! User repository implementation

use async_trait::async_trait;
use chatter_core::{DomainError, RepoResult, User, UserDeletion, UserId, UserRepository};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use tracing::{info, instrument};

use super::error::{map_db_error, map_unique_violation};
use crate::models::UserModel;

/// SQLite-backed user repository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let model = sqlx::query_as::<_, UserModel>(
            "SELECT userid AS id, username, last_login_ts AS last_login_at, admin, active \
             FROM User WHERE userid = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let model = sqlx::query_as::<_, UserModel>(
            "SELECT userid AS id, username, last_login_ts AS last_login_at, admin, active \
             FROM User WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(User::from))
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        let result = sqlx::query(
            "INSERT INTO User (username, password, last_login_ts, admin, active) \
             VALUES (?, ?, NULL, 0, 1)",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken(username.to_string())))?;

        let user = User::new(UserId::new(result.last_insert_rowid()), username.to_string());
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query("UPDATE User SET username = ?, last_login_ts = ? WHERE userid = ?")
            .bind(&user.username)
            .bind(user.last_login_at)
            .bind(user.id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || DomainError::UsernameTaken(user.username.clone()))
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }
        Ok(())
    }

    async fn set_admin(&self, id: UserId, admin: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE User SET admin = ? WHERE userid = ?")
            .bind(admin)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    async fn set_active(&self, id: UserId, active: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE User SET active = ? WHERE userid = ?")
            .bind(active)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: UserId, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query("UPDATE User SET last_login_ts = ? WHERE userid = ?")
            .bind(at)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    async fn password_hash(&self, id: UserId) -> RepoResult<String> {
        let hash: Option<String> = sqlx::query_scalar("SELECT password FROM User WHERE userid = ?")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        hash.ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query("UPDATE User SET password = ? WHERE userid = ?")
            .bind(password_hash)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> RepoResult<UserDeletion> {
        if id.is_sentinel() {
            return Err(DomainError::ReservedUser(id));
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Every chatroom the target owns must keep at least one other
        // owner. All violations are collected up front; if any exist the
        // transaction is dropped before a single row changes.
        let sole_owned: Vec<String> = sqlx::query_scalar(
            "SELECT c.name FROM Chatroom c \
             JOIN ChatroomMember m ON m.chatroomid = c.chatroomid \
             WHERE m.userid = ? AND m.owner = 1 \
               AND NOT EXISTS (SELECT 1 FROM ChatroomMember o \
                               WHERE o.chatroomid = m.chatroomid \
                                 AND o.owner = 1 AND o.userid <> m.userid) \
             ORDER BY c.name",
        )
        .bind(id.into_inner())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if !sole_owned.is_empty() {
            return Err(DomainError::SoleOwner {
                chatrooms: sole_owned,
            });
        }

        let reassigned = sqlx::query("UPDATE Message SET senderid = 0 WHERE senderid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM ChatroomMember WHERE userid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM User WHERE userid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(DomainError::UserNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        info!(
            user_id = %id,
            reassigned_messages = reassigned,
            removed_memberships = removed,
            "user deleted"
        );

        Ok(UserDeletion {
            reassigned_messages: reassigned,
            removed_memberships: removed,
        })
    }
}
