//! Service layer integration tests
//!
//! Every test runs against its own in-memory database seeded through the
//! public services, so the suite needs no external processes.
//!
//! Run with: cargo test -p integration-tests --test service_tests

use anyhow::Result;
use chatter_core::{ChatroomId, DomainError, UserId};
use chatter_service::{AttachmentService, ChatroomService, MessageService, UserService};
use chrono::Utc;
use integration_tests::{seeded, test_context, Fixture, TEST_PASSWORD};

/// Any chatroom that still has membership rows must have at least one
/// owner row among them.
async fn assert_populated_rooms_have_owners(fx: &Fixture) {
    let rooms = ChatroomService::new(&fx.ctx);
    for room in [&fx.general, &fx.random, &fx.ops] {
        let Ok(loaded) = rooms.load(room.id).await else {
            continue;
        };
        let owners = rooms.owners(loaded.id).await.expect("owners");
        let members = rooms.members(loaded.id).await.expect("members");
        if !members.is_empty() {
            assert!(
                !owners.is_empty(),
                "chatroom {} has members but no owner",
                loaded.name
            );
        }
    }
}

// ============================================================================
// Registration and authentication
// ============================================================================

#[tokio::test]
async fn test_register_and_authenticate() -> Result<()> {
    let ctx = test_context().await;
    let users = UserService::new(&ctx);

    let fresh = users.register("mallory", TEST_PASSWORD).await?;
    assert!(fresh.active);
    assert!(!fresh.admin);
    assert!(fresh.last_login_at.is_none());
    assert!(!fresh.has_logged_in());

    let before = Utc::now();
    let authed = users.authenticate("mallory", TEST_PASSWORD).await?;
    let after = Utc::now();

    let stamped = authed.last_login_at.expect("login stamped");
    assert!(stamped >= before && stamped <= after);
    assert_eq!(authed.id, fresh.id);

    // The stamp survives a reload.
    let reloaded = users.get_user(fresh.id).await?;
    let stored = reloaded.last_login_at.expect("stamp persisted");
    assert!((stored - stamped).num_milliseconds().abs() < 1000);
    Ok(())
}

#[tokio::test]
async fn test_authentication_failures_are_uniform() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    // Unknown username.
    let err = users.authenticate("nobody", TEST_PASSWORD).await.unwrap_err();
    assert!(matches!(err, DomainError::AuthenticationFailed));

    // Wrong password for a real account.
    let err = users.authenticate("alice", "not-her-password").await.unwrap_err();
    assert!(matches!(err, DomainError::AuthenticationFailed));

    // Deactivated account with the right password.
    users.set_active(fx.carol.id, fx.admin.id, false).await?;
    let err = users.authenticate("carol", TEST_PASSWORD).await.unwrap_err();
    assert!(matches!(err, DomainError::AuthenticationFailed));
    Ok(())
}

#[tokio::test]
async fn test_short_password_rejected_before_any_write() -> Result<()> {
    let ctx = test_context().await;
    let users = UserService::new(&ctx);

    let err = users.register("shorty", "seven77").await.unwrap_err();
    assert!(matches!(err, DomainError::WeakPassword));
    assert!(users.find_by_username("shorty").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_register_rejects_taken_username() {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    let err = users.register("alice", TEST_PASSWORD).await.unwrap_err();
    assert!(matches!(err, DomainError::UsernameTaken(ref name) if name == "alice"));
}

// ============================================================================
// Credential management
// ============================================================================

#[tokio::test]
async fn test_change_password_flow() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    let err = users
        .change_password(fx.alice.id, "wrong-current", "a whole new phrase")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PasswordMismatch));

    // The new credential is validated before the current one is checked.
    let err = users
        .change_password(fx.alice.id, "wrong-current", "tiny")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::WeakPassword));

    users
        .change_password(fx.alice.id, TEST_PASSWORD, "a whole new phrase")
        .await?;

    let err = users.authenticate("alice", TEST_PASSWORD).await.unwrap_err();
    assert!(matches!(err, DomainError::AuthenticationFailed));
    assert!(users.authenticate("alice", "a whole new phrase").await.is_ok());
    Ok(())
}

// ============================================================================
// Account flags and profile
// ============================================================================

#[tokio::test]
async fn test_admin_flag_is_admin_gated() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    let err = users
        .set_admin(fx.dave.id, fx.alice.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAuthorized(_)));
    assert!(!users.get_user(fx.dave.id).await?.admin);

    users.set_admin(fx.dave.id, fx.admin.id, true).await?;
    assert!(users.get_user(fx.dave.id).await?.admin);

    // A freshly minted admin can act too.
    users.set_admin(fx.dave.id, fx.dave.id, false).await?;
    assert!(!users.get_user(fx.dave.id).await?.admin);
    Ok(())
}

#[tokio::test]
async fn test_deactivation_keeps_all_rows() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);
    let rooms = ChatroomService::new(&fx.ctx);

    users.set_active(fx.bob.id, fx.admin.id, false).await?;

    let bob = users.get_user(fx.bob.id).await?;
    assert!(!bob.active);

    // Memberships and authored history stay untouched.
    assert!(rooms.is_owner(fx.random.id, fx.bob.id).await?);
    let history = rooms.messages(fx.general.id).await?;
    assert!(history.iter().any(|m| m.sender_id == fx.bob.id));
    Ok(())
}

#[tokio::test]
async fn test_rename_updates_lookup() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    let mut erin = users.get_user(fx.erin.id).await?;
    erin.username = "erin_the_second".to_string();
    users.update(&erin).await?;

    assert!(users.find_by_username("erin").await?.is_none());
    let renamed = users
        .find_by_username("erin_the_second")
        .await?
        .expect("renamed");
    assert_eq!(renamed.id, fx.erin.id);

    // Renaming onto an existing name is a conflict.
    erin.username = "alice".to_string();
    let err = users.update(&erin).await.unwrap_err();
    assert!(matches!(err, DomainError::UsernameTaken(_)));
    Ok(())
}

// ============================================================================
// Account deletion
// ============================================================================

#[tokio::test]
async fn test_deleting_a_sole_owner_is_blocked_entirely() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);
    let rooms = ChatroomService::new(&fx.ctx);

    // Alice solely owns general; ops is fine because bob co-owns it.
    let err = users.delete(fx.alice.id, fx.admin.id).await.unwrap_err();
    match err {
        DomainError::SoleOwner { chatrooms } => {
            assert_eq!(chatrooms, vec!["general".to_string()]);
        }
        other => panic!("expected SoleOwner, got {other:?}"),
    }

    // The abort must not have touched a single row.
    assert!(users.get_user(fx.alice.id).await.is_ok());
    assert!(rooms.is_owner(fx.general.id, fx.alice.id).await?);
    let history = rooms.messages(fx.general.id).await?;
    assert!(history.iter().any(|m| m.sender_id == fx.alice.id));
    assert!(history.iter().all(|m| !m.is_anonymized()));
    Ok(())
}

#[tokio::test]
async fn test_deletion_proceeds_once_every_room_has_a_co_owner() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);
    let rooms = ChatroomService::new(&fx.ctx);

    rooms.promote(fx.general.id, fx.bob.id, fx.alice.id).await?;

    let outcome = users.delete(fx.alice.id, fx.admin.id).await?;
    // Two posts in general plus one in ops.
    assert_eq!(outcome.reassigned_messages, 3);
    // general and ops memberships.
    assert_eq!(outcome.removed_memberships, 2);

    let err = users.get_user(fx.alice.id).await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound(_)));

    // Her history survives under the sentinel author.
    let history = rooms.messages(fx.general.id).await?;
    assert_eq!(history.len(), 5);
    assert_eq!(history.iter().filter(|m| m.is_anonymized()).count(), 2);
    assert!(history.iter().all(|m| m.sender_id != fx.alice.id));

    assert_populated_rooms_have_owners(&fx).await;

    // The username is free again; the sentinel id is never reused.
    let second_alice = users.register("alice", TEST_PASSWORD).await?;
    assert_ne!(second_alice.id, fx.alice.id);
    assert!(!second_alice.is_sentinel());
    Ok(())
}

#[tokio::test]
async fn test_only_admins_reach_the_deletion_path() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    let err = users.delete(fx.dave.id, fx.carol.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotAuthorized(_)));
    assert!(users.get_user(fx.dave.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_deleting_a_plain_member() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);
    let rooms = ChatroomService::new(&fx.ctx);

    // Erin owns nothing; she is a member of ops with one post there.
    let outcome = users.delete(fx.erin.id, fx.admin.id).await?;
    assert_eq!(outcome.reassigned_messages, 1);
    assert_eq!(outcome.removed_memberships, 1);

    let members = rooms.members(fx.ops.id).await?;
    assert!(members.iter().all(|m| m.id != fx.erin.id));

    let history = rooms.messages(fx.ops.id).await?;
    let erins = history
        .iter()
        .find(|m| m.content == "dashboards look clean")
        .expect("post kept");
    assert!(erins.is_anonymized());

    assert_populated_rooms_have_owners(&fx).await;
    Ok(())
}

// ============================================================================
// Chatrooms and membership
// ============================================================================

#[tokio::test]
async fn test_owner_and_member_views_partition() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);

    let owners = rooms.owners(fx.ops.id).await?;
    let members = rooms.members(fx.ops.id).await?;

    let owner_names: Vec<_> = owners.iter().map(|u| u.username.as_str()).collect();
    let member_names: Vec<_> = members.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(owner_names, vec!["alice", "bob"]);
    assert_eq!(member_names, vec!["carol", "dave", "erin"]);

    assert!(rooms.is_owner(fx.ops.id, fx.bob.id).await?);
    assert!(!rooms.is_owner(fx.ops.id, fx.carol.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_membership_changes_are_owner_gated() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);

    // Carol is a plain member of general and may not grow it.
    let err = rooms
        .add_member(fx.general.id, fx.erin.id, fx.carol.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAuthorized(_)));

    rooms.add_member(fx.general.id, fx.erin.id, fx.alice.id).await?;
    let err = rooms
        .add_member(fx.general.id, fx.erin.id, fx.alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyMember { .. }));

    // Admins pass the gate without holding a membership.
    rooms
        .remove_member(fx.general.id, fx.erin.id, fx.admin.id)
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_leaving_and_the_last_owner_guard() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);

    // Anyone may walk out on their own.
    rooms.remove_member(fx.random.id, fx.carol.id, fx.carol.id).await?;

    // Bob is random's only owner and dave is still inside.
    let err = rooms
        .remove_member(fx.random.id, fx.bob.id, fx.bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::SoleOwner { .. }));

    rooms.remove_member(fx.random.id, fx.dave.id, fx.bob.id).await?;

    // Alone in the room, the owner may leave; the empty room survives.
    rooms.remove_member(fx.random.id, fx.bob.id, fx.bob.id).await?;
    assert!(rooms.load(fx.random.id).await.is_ok());
    assert!(rooms.owners(fx.random.id).await?.is_empty());
    assert!(rooms.members(fx.random.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_demotion_never_leaves_a_room_ownerless() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);

    rooms.demote(fx.ops.id, fx.bob.id, fx.alice.id).await?;
    assert!(!rooms.is_owner(fx.ops.id, fx.bob.id).await?);

    let err = rooms
        .demote(fx.ops.id, fx.alice.id, fx.alice.id)
        .await
        .unwrap_err();
    match err {
        DomainError::SoleOwner { chatrooms } => {
            assert_eq!(chatrooms, vec!["ops".to_string()]);
        }
        other => panic!("expected SoleOwner, got {other:?}"),
    }
    assert!(rooms.is_owner(fx.ops.id, fx.alice.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_room_deletion_authorization_and_cascade() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);
    let messages = MessageService::new(&fx.ctx);

    let err = rooms.delete(fx.general.id, fx.carol.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotAuthorized(_)));

    // An admin may delete a room they never joined.
    let outcome = rooms.delete(fx.random.id, fx.admin.id).await?;
    assert_eq!(outcome.removed_messages, 3);
    assert_eq!(outcome.removed_memberships, 3);
    assert_eq!(outcome.removed_attachments, 0);

    // An owner may delete their own room, attachments included.
    let outcome = rooms.delete(fx.general.id, fx.alice.id).await?;
    assert_eq!(outcome.removed_messages, 5);
    assert_eq!(outcome.removed_attachments, 2);

    let err = rooms.load(fx.general.id).await.unwrap_err();
    assert!(matches!(err, DomainError::ChatroomNotFound(_)));
    let err = messages.load(fx.general_messages[0].id).await.unwrap_err();
    assert!(matches!(err, DomainError::MessageNotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_room_names_are_unique() {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);

    let err = rooms
        .create("general", "again", fx.dave.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ChatroomNameTaken(ref name) if name == "general"));
}

// ============================================================================
// Messages and incremental sync
// ============================================================================

#[tokio::test]
async fn test_posting_gates() -> Result<()> {
    let fx = seeded().await;
    let messages = MessageService::new(&fx.ctx);

    // Erin never joined general.
    let err = messages
        .post(fx.general.id, fx.erin.id, "let me in")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAuthorized(_)));

    let err = messages.post(fx.general.id, fx.alice.id, "").await.unwrap_err();
    assert!(matches!(err, DomainError::EmptyMessage));

    let err = messages
        .post(ChatroomId::new(999), fx.alice.id, "hello?")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ChatroomNotFound(_)));

    // Nothing above may have landed in the history.
    let rooms = ChatroomService::new(&fx.ctx);
    assert_eq!(rooms.messages(fx.general.id).await?.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_history_is_ordered_and_scoped() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);

    let history = rooms.messages(fx.general.id).await?;
    let bodies: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        bodies,
        vec![
            "morning all",
            "morning",
            "anyone seen the build?",
            "green as of 9:40",
            "nice"
        ]
    );
    assert!(history.windows(2).all(|w| w[0].id < w[1].id));

    // Other rooms never bleed in.
    assert!(history.iter().all(|m| m.chatroom_id == fx.general.id));
    Ok(())
}

#[tokio::test]
async fn test_incremental_sync_with_a_client_cursor() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);
    let messages = MessageService::new(&fx.ctx);

    // A client that has seen the first three messages catches up.
    let cursor = fx.general_messages[2].id;
    let tail = rooms.messages_since(fx.general.id, cursor).await?;
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].id, fx.general_messages[3].id);

    // Fully caught up: nothing to fetch.
    let cursor = fx.general_messages[4].id;
    assert!(rooms.messages_since(fx.general.id, cursor).await?.is_empty());

    // Traffic in other rooms does not disturb the cursor.
    messages.post(fx.random.id, fx.dave.id, "unrelated").await?;
    assert!(rooms.messages_since(fx.general.id, cursor).await?.is_empty());

    let fresh = messages.post(fx.general.id, fx.bob.id, "one more").await?;
    let tail = rooms.messages_since(fx.general.id, cursor).await?;
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, fresh.id);
    Ok(())
}

#[tokio::test]
async fn test_message_deletion_takes_attachments_along() -> Result<()> {
    let fx = seeded().await;
    let rooms = ChatroomService::new(&fx.ctx);
    let messages = MessageService::new(&fx.ctx);

    let doomed = fx.general_messages[0].id;
    assert_eq!(messages.attachments(doomed).await?.len(), 2);

    let removed = messages.delete(doomed).await?;
    assert_eq!(removed, 2);

    let err = messages.load(doomed).await.unwrap_err();
    assert!(matches!(err, DomainError::MessageNotFound(_)));
    assert_eq!(rooms.messages(fx.general.id).await?.len(), 4);
    Ok(())
}

// ============================================================================
// Attachments
// ============================================================================

#[tokio::test]
async fn test_attachment_round_trip() -> Result<()> {
    let fx = seeded().await;
    let attachments = AttachmentService::new(&fx.ctx);

    let created = attachments
        .create(fx.random_messages[0].id, "/uploads/menu.pdf")
        .await?;
    assert_eq!(created.file_name(), "menu.pdf");

    let listed = attachments.for_message(fx.random_messages[0].id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);

    attachments.delete(created.id).await?;
    let err = attachments.delete(created.id).await.unwrap_err();
    assert!(matches!(err, DomainError::AttachmentNotFound(_)));

    let err = attachments
        .create(chatter_core::MessageId::new(9999), "/uploads/ghost.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::MessageNotFound(_)));
    Ok(())
}

// ============================================================================
// Sentinel account
// ============================================================================

#[tokio::test]
async fn test_sentinel_is_visible_but_untouchable() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);

    let sentinel = users.get_user(UserId::SENTINEL).await?;
    assert_eq!(sentinel.username, "DeletedUser");
    assert!(!sentinel.active);

    // Its stored credential is empty and can never verify.
    let err = users
        .authenticate("DeletedUser", TEST_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AuthenticationFailed));

    let err = users
        .set_admin(UserId::SENTINEL, fx.admin.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ReservedUser(_)));

    let err = users
        .set_active(UserId::SENTINEL, fx.admin.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ReservedUser(_)));

    let err = users
        .change_password(UserId::SENTINEL, "", "irrelevant-here")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ReservedUser(_)));

    let err = users.delete(UserId::SENTINEL, fx.admin.id).await.unwrap_err();
    assert!(matches!(err, DomainError::ReservedUser(_)));
    Ok(())
}

// ============================================================================
// Invariant under churn
// ============================================================================

#[tokio::test]
async fn test_ownership_invariant_survives_a_churn_sequence() -> Result<()> {
    let fx = seeded().await;
    let users = UserService::new(&fx.ctx);
    let rooms = ChatroomService::new(&fx.ctx);

    rooms.promote(fx.general.id, fx.carol.id, fx.alice.id).await?;
    rooms.demote(fx.general.id, fx.alice.id, fx.carol.id).await?;
    rooms.remove_member(fx.ops.id, fx.dave.id, fx.dave.id).await?;
    users.delete(fx.erin.id, fx.admin.id).await?;
    rooms.promote(fx.random.id, fx.dave.id, fx.bob.id).await?;
    users.delete(fx.bob.id, fx.admin.id).await?;

    assert_populated_rooms_have_owners(&fx).await;
    Ok(())
}
