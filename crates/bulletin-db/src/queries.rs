use crate::Database;
use crate::models::{AccountRow, MessageRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl Database {
    // -- Accounts --

    /// Insert an account and return its store-assigned id.
    pub fn insert_account(&self, username: &str, password: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (username, password) VALUES (?1, ?2)",
                (username, password),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account_by_username(conn, username))
    }

    pub fn get_account_by_id(&self, account_id: i64) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account_by_id(conn, account_id))
    }

    // -- Messages --

    /// Insert a message and return its store-assigned id.
    pub fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: Option<i64>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (posted_by, message_text, time_posted_epoch) VALUES (?1, ?2, ?3)",
                rusqlite::params![posted_by, message_text, time_posted_epoch],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_all_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(query_all_messages)
    }

    pub fn get_message_by_id(&self, message_id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message_by_id(conn, message_id))
    }

    /// Rows removed: 1 if the message existed, 0 otherwise.
    pub fn delete_message(&self, message_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM messages WHERE message_id = ?1", [message_id])?;
            Ok(removed)
        })
    }

    /// Replace the text of a message in place. Rows updated: 1 or 0.
    pub fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE messages SET message_text = ?1 WHERE message_id = ?2",
                rusqlite::params![message_text, message_id],
            )?;
            Ok(updated)
        })
    }

    pub fn get_messages_by_account(&self, account_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages_by_account(conn, account_id))
    }
}

fn query_account_by_username(conn: &Connection, username: &str) -> Result<Option<AccountRow>> {
    let mut stmt =
        conn.prepare("SELECT account_id, username, password FROM accounts WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(AccountRow {
                account_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_account_by_id(conn: &Connection, account_id: i64) -> Result<Option<AccountRow>> {
    let mut stmt =
        conn.prepare("SELECT account_id, username, password FROM accounts WHERE account_id = ?1")?;

    let row = stmt
        .query_row([account_id], |row| {
            Ok(AccountRow {
                account_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_all_messages(conn: &Connection) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT message_id, posted_by, message_text, time_posted_epoch
         FROM messages
         ORDER BY message_id",
    )?;

    let rows = stmt
        .query_map([], message_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_message_by_id(conn: &Connection, message_id: i64) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT message_id, posted_by, message_text, time_posted_epoch
         FROM messages
         WHERE message_id = ?1",
    )?;

    let row = stmt.query_row([message_id], message_row).optional()?;

    Ok(row)
}

fn query_messages_by_account(conn: &Connection, account_id: i64) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT message_id, posted_by, message_text, time_posted_epoch
         FROM messages
         WHERE posted_by = ?1
         ORDER BY message_id",
    )?;

    let rows = stmt
        .query_map([account_id], message_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn message_row(row: &rusqlite::Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        message_id: row.get(0)?,
        posted_by: row.get(1)?,
        message_text: row.get(2)?,
        time_posted_epoch: row.get(3)?,
    })
}
