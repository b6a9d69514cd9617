use serde::{Deserialize, Serialize};

/// A registered account, as stored and as returned on the wire. Login
/// echoes the stored row back verbatim, password included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    /// Client-supplied timestamp, carried through without validation.
    pub time_posted_epoch: Option<i64>,
}
