//! Chatroom service
//!
//! Room lifecycle, membership management behind the ownership guards, and
//! the history accessors. Owner and member lists are separate lazy queries
//! rather than fields of the room, so loading a room stays O(1).

use chatter_core::{
    Chatroom, ChatroomDeletion, ChatroomId, ChatroomMember, DomainError, Message, MessageId,
    MessageQuery, RepoResult, User, UserId,
};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

/// Chatroom service
pub struct ChatroomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatroomService<'a> {
    /// Create a new ChatroomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a chatroom with the founder installed as its first owner
    ///
    /// Any registered user may found a room; the two inserts share one
    /// transaction so a room never exists ownerless.
    #[instrument(skip(self, description))]
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        founder_id: UserId,
    ) -> RepoResult<Chatroom> {
        let room = self
            .ctx
            .chatroom_repo()
            .create(name, description, founder_id)
            .await?;
        info!(chatroom_id = %room.id, founder = %founder_id, "chatroom created");
        Ok(room)
    }

    /// Load a chatroom by id
    pub async fn load(&self, chatroom_id: ChatroomId) -> RepoResult<Chatroom> {
        self.ctx
            .chatroom_repo()
            .find_by_id(chatroom_id)
            .await?
            .ok_or(DomainError::ChatroomNotFound(chatroom_id))
    }

    /// Look up a chatroom by its unique name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Chatroom>> {
        self.ctx.chatroom_repo().find_by_name(name).await
    }

    /// Users holding the owner flag in the chatroom
    pub async fn owners(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<User>> {
        self.load(chatroom_id).await?;
        self.ctx.member_repo().owners_of(chatroom_id).await
    }

    /// Users in the chatroom without the owner flag
    pub async fn members(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<User>> {
        self.load(chatroom_id).await?;
        self.ctx.member_repo().members_of(chatroom_id).await
    }

    /// Check whether the user holds an owner membership in the chatroom
    pub async fn is_owner(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<bool> {
        self.ctx.member_repo().is_owner(chatroom_id, user_id).await
    }

    /// Message history restricted by the given query, id ascending
    pub async fn history(
        &self,
        chatroom_id: ChatroomId,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        self.load(chatroom_id).await?;
        self.ctx.message_repo().for_chatroom(chatroom_id, query).await
    }

    /// Full message history for the chatroom
    pub async fn messages(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<Message>> {
        self.history(chatroom_id, MessageQuery::all()).await
    }

    /// Messages newer than the cursor, the incremental-sync path
    ///
    /// Clients keep the highest message id they have seen and hand it back;
    /// an unchanged room yields an empty vec.
    pub async fn messages_since(
        &self,
        chatroom_id: ChatroomId,
        cursor: MessageId,
    ) -> RepoResult<Vec<Message>> {
        self.history(chatroom_id, MessageQuery::since(cursor)).await
    }

    /// Add a user to the chatroom as a plain member. Owner or admin only.
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        chatroom_id: ChatroomId,
        user_id: UserId,
        acting_id: UserId,
    ) -> RepoResult<()> {
        // The membership table does not reference Chatroom, so the room's
        // existence has to be checked here.
        self.load(chatroom_id).await?;
        self.require_owner_or_admin(chatroom_id, acting_id).await?;

        self.ctx
            .member_repo()
            .add(&ChatroomMember::new(chatroom_id, user_id))
            .await?;
        info!(chatroom_id = %chatroom_id, user_id = %user_id, acting = %acting_id, "member added");
        Ok(())
    }

    /// Grant the owner flag to a member. Owner or admin only.
    #[instrument(skip(self))]
    pub async fn promote(
        &self,
        chatroom_id: ChatroomId,
        user_id: UserId,
        acting_id: UserId,
    ) -> RepoResult<()> {
        self.require_owner_or_admin(chatroom_id, acting_id).await?;
        self.ctx
            .member_repo()
            .set_owner(chatroom_id, user_id, true)
            .await?;
        info!(chatroom_id = %chatroom_id, user_id = %user_id, "member promoted to owner");
        Ok(())
    }

    /// Take the owner flag from a member. Owner or admin only.
    ///
    /// Fails `SoleOwner` if this would leave the room ownerless.
    #[instrument(skip(self))]
    pub async fn demote(
        &self,
        chatroom_id: ChatroomId,
        user_id: UserId,
        acting_id: UserId,
    ) -> RepoResult<()> {
        self.require_owner_or_admin(chatroom_id, acting_id).await?;
        self.ctx
            .member_repo()
            .set_owner(chatroom_id, user_id, false)
            .await?;
        info!(chatroom_id = %chatroom_id, user_id = %user_id, "owner demoted to member");
        Ok(())
    }

    /// Remove a member from the chatroom
    ///
    /// Members may remove themselves; removing anyone else takes room
    /// ownership or admin. The last owner cannot leave while other members
    /// remain.
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        chatroom_id: ChatroomId,
        user_id: UserId,
        acting_id: UserId,
    ) -> RepoResult<()> {
        if user_id != acting_id {
            self.require_owner_or_admin(chatroom_id, acting_id).await?;
        }

        self.ctx.member_repo().remove(chatroom_id, user_id).await?;
        info!(chatroom_id = %chatroom_id, user_id = %user_id, acting = %acting_id, "member removed");
        Ok(())
    }

    /// Delete the chatroom and everything in it. Owner or admin only.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        chatroom_id: ChatroomId,
        acting_id: UserId,
    ) -> RepoResult<ChatroomDeletion> {
        self.require_owner_or_admin(chatroom_id, acting_id).await?;

        let outcome = self.ctx.chatroom_repo().delete(chatroom_id).await?;
        info!(
            chatroom_id = %chatroom_id,
            acting = %acting_id,
            removed_messages = outcome.removed_messages,
            removed_attachments = outcome.removed_attachments,
            "chatroom deleted"
        );
        Ok(outcome)
    }

    async fn require_owner_or_admin(
        &self,
        chatroom_id: ChatroomId,
        acting_id: UserId,
    ) -> RepoResult<()> {
        if self.ctx.member_repo().is_owner(chatroom_id, acting_id).await? {
            return Ok(());
        }

        let acting = self
            .ctx
            .user_repo()
            .find_by_id(acting_id)
            .await?
            .ok_or(DomainError::UserNotFound(acting_id))?;
        if acting.admin {
            return Ok(());
        }

        warn!(chatroom_id = %chatroom_id, acting = %acting_id, "rejected: chatroom ownership required");
        Err(DomainError::NotAuthorized(
            "chatroom ownership or administrator privileges required".to_string(),
        ))
    }
}
