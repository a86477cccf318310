//! Schema bootstrap
//!
//! `init_schema` performs a destructive re-initialization: all five tables
//! are dropped and recreated inside one transaction, then the reserved
//! `DeletedUser` row is seeded with id 0. Any "are you sure" interaction
//! belongs to the caller; this function assumes consent was already given.

use sqlx::sqlite::SqlitePool;
use tracing::info;

/// Children first so foreign key enforcement never sees a dangling parent.
const DROP_TABLES: [&str; 5] = [
    "DROP TABLE IF EXISTS Attachment",
    "DROP TABLE IF EXISTS Message",
    "DROP TABLE IF EXISTS ChatroomMember",
    "DROP TABLE IF EXISTS Chatroom",
    "DROP TABLE IF EXISTS User",
];

const CREATE_TABLES: [&str; 5] = [
    "CREATE TABLE User (
        userid        INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL UNIQUE,
        password      TEXT NOT NULL,
        last_login_ts TEXT,
        admin         INTEGER NOT NULL DEFAULT 0,
        active        INTEGER NOT NULL DEFAULT 1
    )",
    "CREATE TABLE Chatroom (
        chatroomid  INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE ChatroomMember (
        chatroomid INTEGER NOT NULL,
        userid     INTEGER NOT NULL,
        owner      INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (chatroomid, userid),
        FOREIGN KEY (userid) REFERENCES User (userid)
    )",
    "CREATE TABLE Message (
        messageid  INTEGER PRIMARY KEY AUTOINCREMENT,
        content    TEXT NOT NULL,
        chatroomid INTEGER NOT NULL,
        senderid   INTEGER NOT NULL,
        timestamp  TEXT NOT NULL,
        FOREIGN KEY (chatroomid) REFERENCES Chatroom (chatroomid),
        FOREIGN KEY (senderid) REFERENCES User (userid)
    )",
    "CREATE TABLE Attachment (
        attachmentid INTEGER PRIMARY KEY AUTOINCREMENT,
        messageid    INTEGER NOT NULL,
        filepath     TEXT NOT NULL,
        FOREIGN KEY (messageid) REFERENCES Message (messageid)
    )",
];

/// Placeholder owner for messages whose author was deleted. Lives at the
/// reserved id 0 so AUTOINCREMENT hands real users ids from 1 upward.
const SEED_SENTINEL: &str = "INSERT INTO User \
    (userid, username, password, last_login_ts, admin, active) \
    VALUES (0, 'DeletedUser', '', NULL, 0, 0)";

/// Drop and recreate the whole schema, seeding the sentinel user.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in DROP_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query(SEED_SENTINEL).execute(&mut *tx).await?;

    tx.commit().await?;

    info!("database schema initialized");
    Ok(())
}
