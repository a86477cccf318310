//! Test fixtures
//!
//! Seeds a small deterministic world through the public services: six
//! accounts (one administrator) and three chatrooms with overlapping
//! memberships, message history, and a few attachments.

use chatter_core::{Chatroom, Message, User};
use chatter_service::{ChatroomService, MessageService, ServiceContext, UserService};

/// Password shared by every seeded account
pub const TEST_PASSWORD: &str = "correct-battery-staple";

/// The standard seeded world
///
/// Membership matrix:
/// - `general`: alice (owner), bob, carol
/// - `random`:  bob (owner), carol, dave
/// - `ops`:     alice and bob (owners), carol, dave, erin
pub struct Fixture {
    pub ctx: ServiceContext,
    pub admin: User,
    pub alice: User,
    pub bob: User,
    pub carol: User,
    pub dave: User,
    pub erin: User,
    pub general: Chatroom,
    pub random: Chatroom,
    pub ops: Chatroom,
    pub general_messages: Vec<Message>,
    pub random_messages: Vec<Message>,
    pub ops_messages: Vec<Message>,
}

impl Fixture {
    /// Seed the standard world into a fresh context
    pub async fn seed(ctx: ServiceContext) -> Self {
        let users = UserService::new(&ctx);
        let rooms = ChatroomService::new(&ctx);
        let messages = MessageService::new(&ctx);

        // The first administrator is bootstrapped at the repository level;
        // the service gate would otherwise require an admin to exist.
        let admin = users.register("admin", TEST_PASSWORD).await.expect("admin");
        ctx.user_repo()
            .set_admin(admin.id, true)
            .await
            .expect("bootstrap admin");
        let admin = users.get_user(admin.id).await.expect("reload admin");

        let alice = users.register("alice", TEST_PASSWORD).await.expect("alice");
        let bob = users.register("bob", TEST_PASSWORD).await.expect("bob");
        let carol = users.register("carol", TEST_PASSWORD).await.expect("carol");
        let dave = users.register("dave", TEST_PASSWORD).await.expect("dave");
        let erin = users.register("erin", TEST_PASSWORD).await.expect("erin");

        let general = rooms
            .create("general", "everything else", alice.id)
            .await
            .expect("general");
        rooms
            .add_member(general.id, bob.id, alice.id)
            .await
            .expect("general += bob");
        rooms
            .add_member(general.id, carol.id, alice.id)
            .await
            .expect("general += carol");

        let random = rooms
            .create("random", "off topic", bob.id)
            .await
            .expect("random");
        rooms
            .add_member(random.id, carol.id, bob.id)
            .await
            .expect("random += carol");
        rooms
            .add_member(random.id, dave.id, bob.id)
            .await
            .expect("random += dave");

        let ops = rooms
            .create("ops", "deploys and incidents", alice.id)
            .await
            .expect("ops");
        for user in [&bob, &carol, &dave, &erin] {
            rooms
                .add_member(ops.id, user.id, alice.id)
                .await
                .expect("ops member");
        }
        rooms
            .promote(ops.id, bob.id, alice.id)
            .await
            .expect("ops co-owner");

        let mut general_messages = Vec::new();
        for (sender, body) in [
            (&alice, "morning all"),
            (&bob, "morning"),
            (&carol, "anyone seen the build?"),
            (&alice, "green as of 9:40"),
            (&bob, "nice"),
        ] {
            general_messages.push(
                messages
                    .post(general.id, sender.id, body)
                    .await
                    .expect("general post"),
            );
        }
        messages
            .attach(general_messages[0].id, "/uploads/agenda.pdf")
            .await
            .expect("attach agenda");
        messages
            .attach(general_messages[0].id, "/uploads/minutes.txt")
            .await
            .expect("attach minutes");

        let mut random_messages = Vec::new();
        for (sender, body) in [
            (&bob, "lunch?"),
            (&carol, "in ten"),
            (&dave, "save me a seat"),
        ] {
            random_messages.push(
                messages
                    .post(random.id, sender.id, body)
                    .await
                    .expect("random post"),
            );
        }

        let mut ops_messages = Vec::new();
        for (sender, body) in [
            (&alice, "deploy window at 16:00"),
            (&bob, "ack"),
            (&erin, "dashboards look clean"),
            (&dave, "rollback plan is in the wiki"),
        ] {
            ops_messages.push(
                messages
                    .post(ops.id, sender.id, body)
                    .await
                    .expect("ops post"),
            );
        }
        messages
            .attach(ops_messages[2].id, "/uploads/grafana.png")
            .await
            .expect("attach dashboard");
        messages
            .attach(ops_messages[3].id, "/uploads/runbook.md")
            .await
            .expect("attach runbook");

        Self {
            ctx,
            admin,
            alice,
            bob,
            carol,
            dave,
            erin,
            general,
            random,
            ops,
            general_messages,
            random_messages,
            ops_messages,
        }
    }
}
