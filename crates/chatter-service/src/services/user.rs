//! User service
//!
//! Registration, authentication, credential and flag management, and the
//! entry point for account deletion.

use chatter_common::{hash_password, validate_password_length, verify_password};
use chatter_core::{DomainError, RepoResult, User, UserDeletion, UserId};
use chrono::Utc;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user with the signup defaults
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> RepoResult<User> {
        // Reject weak credentials before anything is written.
        validate_password_length(password)?;
        let password_hash = hash_password(password)?;

        let user = self.ctx.user_repo().create(username, &password_hash).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate a user by username and password
    ///
    /// On success the last-login timestamp is refreshed and the returned
    /// entity reflects it. Unknown username, wrong password, and inactive
    /// account all surface as the same `AuthenticationFailed` so the error
    /// kind cannot be used to probe which usernames exist.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> RepoResult<User> {
        let Some(mut user) = self.ctx.user_repo().find_by_username(username).await? else {
            warn!(username, "authentication failed: unknown username");
            return Err(DomainError::AuthenticationFailed);
        };

        let stored = self.ctx.user_repo().password_hash(user.id).await?;
        if !verify_password(password, &stored) {
            warn!(user_id = %user.id, "authentication failed: wrong password");
            return Err(DomainError::AuthenticationFailed);
        }

        if !user.active {
            warn!(user_id = %user.id, "authentication failed: account inactive");
            return Err(DomainError::AuthenticationFailed);
        }

        let now = Utc::now();
        self.ctx.user_repo().touch_last_login(user.id, now).await?;
        user.record_login(now);

        info!(user_id = %user.id, "user authenticated");
        Ok(user)
    }

    /// Load a user by id
    pub async fn get_user(&self, user_id: UserId) -> RepoResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))
    }

    /// Look up a user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.ctx.user_repo().find_by_username(username).await
    }

    /// Persist the profile fields carried on the entity
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update(&self, user: &User) -> RepoResult<()> {
        if user.id.is_sentinel() {
            return Err(DomainError::ReservedUser(user.id));
        }
        self.ctx.user_repo().update(user).await
    }

    /// Change a user's password after verifying the current one
    #[instrument(skip(self, current, new))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        current: &str,
        new: &str,
    ) -> RepoResult<()> {
        if user_id.is_sentinel() {
            return Err(DomainError::ReservedUser(user_id));
        }
        validate_password_length(new)?;

        let stored = self.ctx.user_repo().password_hash(user_id).await?;
        if !verify_password(current, &stored) {
            warn!(user_id = %user_id, "password change rejected: current password does not verify");
            return Err(DomainError::PasswordMismatch);
        }

        let password_hash = hash_password(new)?;
        self.ctx
            .user_repo()
            .update_password(user_id, &password_hash)
            .await?;

        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Grant or revoke the admin flag. Admin only.
    #[instrument(skip(self))]
    pub async fn set_admin(
        &self,
        target_id: UserId,
        acting_id: UserId,
        grant: bool,
    ) -> RepoResult<()> {
        self.require_admin(acting_id).await?;
        if target_id.is_sentinel() {
            return Err(DomainError::ReservedUser(target_id));
        }

        self.ctx.user_repo().set_admin(target_id, grant).await?;
        info!(target = %target_id, acting = %acting_id, grant, "admin flag updated");
        Ok(())
    }

    /// Activate or deactivate an account. Admin only.
    ///
    /// A deactivated account keeps all its rows but can no longer
    /// authenticate.
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        target_id: UserId,
        acting_id: UserId,
        active: bool,
    ) -> RepoResult<()> {
        self.require_admin(acting_id).await?;
        if target_id.is_sentinel() {
            return Err(DomainError::ReservedUser(target_id));
        }

        self.ctx.user_repo().set_active(target_id, active).await?;
        info!(target = %target_id, acting = %acting_id, active, "active flag updated");
        Ok(())
    }

    /// Delete an account through the deletion orchestrator. Admin only.
    ///
    /// The repository runs the whole cascade in one transaction: the
    /// sole-owner check over every chatroom the target owns, message
    /// reassignment to the sentinel, membership cleanup, then the row
    /// itself.
    #[instrument(skip(self))]
    pub async fn delete(&self, target_id: UserId, acting_id: UserId) -> RepoResult<UserDeletion> {
        self.require_admin(acting_id).await?;

        let outcome = self.ctx.user_repo().delete(target_id).await?;
        info!(
            target = %target_id,
            acting = %acting_id,
            reassigned_messages = outcome.reassigned_messages,
            removed_memberships = outcome.removed_memberships,
            "user account deleted"
        );
        Ok(outcome)
    }

    async fn require_admin(&self, acting_id: UserId) -> RepoResult<()> {
        let acting = self.get_user(acting_id).await?;
        if !acting.admin {
            warn!(acting = %acting_id, "rejected: administrator privileges required");
            return Err(DomainError::NotAuthorized(
                "administrator privileges required".to_string(),
            ));
        }
        Ok(())
    }
}
