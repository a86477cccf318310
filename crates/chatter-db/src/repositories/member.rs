//! Membership repository implementation
//!
//! `set_owner` and `remove` carry the last-owner guards: a chatroom that
//! still has members must never be left ownerless. Both run their check
//! and mutation inside one transaction so the guard cannot race.

use async_trait::async_trait;
use chatter_core::{
    ChatroomId, ChatroomMember, DomainError, MemberRepository, RepoResult, User, UserId,
};
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};
use tracing::instrument;

use super::error::{map_db_error, map_unique_violation};
use crate::models::{MemberModel, UserModel};

/// SQLite-backed membership repository
#[derive(Debug, Clone)]
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Resolve a chatroom's display name for the `SoleOwner` payload.
async fn room_name(
    tx: &mut Transaction<'_, Sqlite>,
    chatroom_id: ChatroomId,
) -> RepoResult<String> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM Chatroom WHERE chatroomid = ?")
        .bind(chatroom_id.into_inner())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;

    name.ok_or(DomainError::ChatroomNotFound(chatroom_id))
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn find(
        &self,
        chatroom_id: ChatroomId,
        user_id: UserId,
    ) -> RepoResult<Option<ChatroomMember>> {
        let model = sqlx::query_as::<_, MemberModel>(
            "SELECT chatroomid AS chatroom_id, userid AS user_id, owner \
             FROM ChatroomMember WHERE chatroomid = ? AND userid = ?",
        )
        .bind(chatroom_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(ChatroomMember::from))
    }

    async fn add(&self, member: &ChatroomMember) -> RepoResult<()> {
        sqlx::query("INSERT INTO ChatroomMember (chatroomid, userid, owner) VALUES (?, ?, ?)")
            .bind(member.chatroom_id.into_inner())
            .bind(member.user_id.into_inner())
            .bind(member.owner)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    DomainError::UserNotFound(member.user_id)
                }
                _ => map_unique_violation(e, || DomainError::AlreadyMember {
                    chatroom_id: member.chatroom_id,
                    user_id: member.user_id,
                }),
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_owner(
        &self,
        chatroom_id: ChatroomId,
        user_id: UserId,
        owner: bool,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current: Option<bool> = sqlx::query_scalar(
            "SELECT owner FROM ChatroomMember WHERE chatroomid = ? AND userid = ?",
        )
        .bind(chatroom_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(currently_owner) = current else {
            return Err(DomainError::MembershipNotFound {
                chatroom_id,
                user_id,
            });
        };

        // Demoting the last owner is refused outright, whether or not
        // anyone else is in the room.
        if currently_owner && !owner {
            let other_owners: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM ChatroomMember \
                 WHERE chatroomid = ? AND owner = 1 AND userid <> ?",
            )
            .bind(chatroom_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if other_owners == 0 {
                let name = room_name(&mut tx, chatroom_id).await?;
                return Err(DomainError::SoleOwner {
                    chatrooms: vec![name],
                });
            }
        }

        sqlx::query("UPDATE ChatroomMember SET owner = ? WHERE chatroomid = ? AND userid = ?")
            .bind(owner)
            .bind(chatroom_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current: Option<bool> = sqlx::query_scalar(
            "SELECT owner FROM ChatroomMember WHERE chatroomid = ? AND userid = ?",
        )
        .bind(chatroom_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(currently_owner) = current else {
            return Err(DomainError::MembershipNotFound {
                chatroom_id,
                user_id,
            });
        };

        // The last owner may only leave once the room is otherwise empty;
        // a lone member walking out leaves nothing behind to orphan.
        if currently_owner {
            let other_owners: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM ChatroomMember \
                 WHERE chatroomid = ? AND owner = 1 AND userid <> ?",
            )
            .bind(chatroom_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if other_owners == 0 {
                let other_members: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM ChatroomMember WHERE chatroomid = ? AND userid <> ?",
                )
                .bind(chatroom_id.into_inner())
                .bind(user_id.into_inner())
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;

                if other_members > 0 {
                    let name = room_name(&mut tx, chatroom_id).await?;
                    return Err(DomainError::SoleOwner {
                        chatrooms: vec![name],
                    });
                }
            }
        }

        sqlx::query("DELETE FROM ChatroomMember WHERE chatroomid = ? AND userid = ?")
            .bind(chatroom_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn owners_of(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<User>> {
        let models = sqlx::query_as::<_, UserModel>(
            "SELECT u.userid AS id, u.username, u.last_login_ts AS last_login_at, \
                    u.admin, u.active \
             FROM User u JOIN ChatroomMember m ON m.userid = u.userid \
             WHERE m.chatroomid = ? AND m.owner = 1 \
             ORDER BY u.userid",
        )
        .bind(chatroom_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn members_of(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<User>> {
        let models = sqlx::query_as::<_, UserModel>(
            "SELECT u.userid AS id, u.username, u.last_login_ts AS last_login_at, \
                    u.admin, u.active \
             FROM User u JOIN ChatroomMember m ON m.userid = u.userid \
             WHERE m.chatroomid = ? AND m.owner = 0 \
             ORDER BY u.userid",
        )
        .bind(chatroom_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn memberships_of(&self, user_id: UserId) -> RepoResult<Vec<ChatroomMember>> {
        let models = sqlx::query_as::<_, MemberModel>(
            "SELECT chatroomid AS chatroom_id, userid AS user_id, owner \
             FROM ChatroomMember WHERE userid = ? ORDER BY chatroomid",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(ChatroomMember::from).collect())
    }

    async fn is_member(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<bool> {
        let row: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM ChatroomMember WHERE chatroomid = ? AND userid = ?")
                .bind(chatroom_id.into_inner())
                .bind(user_id.into_inner())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(row.is_some())
    }

    async fn is_owner(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<bool> {
        let row: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM ChatroomMember WHERE chatroomid = ? AND userid = ? AND owner = 1",
        )
        .bind(chatroom_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.is_some())
    }
}
