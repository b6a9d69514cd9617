/// Database row types — these map directly to SQLite rows.
/// Distinct from the bulletin-types wire models to keep the DB layer independent.

pub struct AccountRow {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

pub struct MessageRow {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: Option<i64>,
}
