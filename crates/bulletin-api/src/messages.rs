use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use bulletin_db::Database;
use bulletin_db::models::MessageRow;
use bulletin_types::api::{NewMessageRequest, UpdateMessageRequest};
use bulletin_types::models::Message;

use crate::accounts::{AppState, join_error};
use crate::error::ApiError;

/// Message lifecycle rules: text validation, author existence at creation
/// time, and single-row store operations.
pub struct MessageService<'a> {
    db: &'a Database,
}

impl<'a> MessageService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create(&self, req: NewMessageRequest) -> Result<Message, ApiError> {
        validate_text(&req.message_text)?;

        if self.db.get_account_by_id(req.posted_by)?.is_none() {
            return Err(ApiError::UnknownAuthor(req.posted_by));
        }

        let message_id =
            self.db
                .insert_message(req.posted_by, &req.message_text, req.time_posted_epoch)?;

        Ok(Message {
            message_id,
            posted_by: req.posted_by,
            message_text: req.message_text,
            time_posted_epoch: req.time_posted_epoch,
        })
    }

    pub fn all(&self) -> Result<Vec<Message>, ApiError> {
        let rows = self.db.get_all_messages()?;
        Ok(rows.into_iter().map(to_message).collect())
    }

    pub fn by_id(&self, message_id: i64) -> Result<Option<Message>, ApiError> {
        Ok(self.db.get_message_by_id(message_id)?.map(to_message))
    }

    /// Rows removed: 1 or 0. Deleting an absent message is not an error.
    pub fn delete(&self, message_id: i64) -> Result<usize, ApiError> {
        Ok(self.db.delete_message(message_id)?)
    }

    /// Replaces the text only; author existence is not re-checked here.
    pub fn update_text(&self, message_id: i64, req: UpdateMessageRequest) -> Result<usize, ApiError> {
        validate_text(&req.message_text)?;

        let updated = self.db.update_message_text(message_id, &req.message_text)?;
        if updated == 0 {
            return Err(ApiError::MessageNotFound(message_id));
        }

        Ok(updated)
    }

    pub fn by_account(&self, account_id: i64) -> Result<Vec<Message>, ApiError> {
        let rows = self.db.get_messages_by_account(account_id)?;
        Ok(rows.into_iter().map(to_message).collect())
    }
}

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::Validation("message text cannot be blank"));
    }
    // The limit counts characters of the untrimmed text.
    if text.chars().count() > 255 {
        return Err(ApiError::Validation(
            "message text cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn to_message(row: MessageRow) -> Message {
    Message {
        message_id: row.message_id,
        posted_by: row.posted_by,
        message_text: row.message_text,
        time_posted_epoch: row.time_posted_epoch,
    }
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<NewMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = tokio::task::spawn_blocking(move || MessageService::new(&state.db).create(req))
        .await
        .map_err(join_error)??;

    Ok(Json(message))
}

pub async fn get_all_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let messages = tokio::task::spawn_blocking(move || MessageService::new(&state.db).all())
        .await
        .map_err(join_error)??;

    Ok(Json(messages))
}

/// An absent message is a normal outcome: 200 with an empty body.
pub async fn get_message_by_id(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let message =
        tokio::task::spawn_blocking(move || MessageService::new(&state.db).by_id(message_id))
            .await
            .map_err(join_error)??;

    Ok(match message {
        Some(message) => Json(message).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

/// Responds 200 either way: the removed-row count when the message existed,
/// an empty body when it did not.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let removed =
        tokio::task::spawn_blocking(move || MessageService::new(&state.db).delete(message_id))
            .await
            .map_err(join_error)??;

    Ok(if removed == 0 {
        StatusCode::OK.into_response()
    } else {
        Json(removed).into_response()
    })
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = tokio::task::spawn_blocking(move || {
        MessageService::new(&state.db).update_text(message_id, req)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(updated))
}

pub async fn get_messages_by_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let messages =
        tokio::task::spawn_blocking(move || MessageService::new(&state.db).by_account(account_id))
            .await
            .map_err(join_error)??;

    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_message(posted_by: i64, text: &str) -> NewMessageRequest {
        NewMessageRequest {
            posted_by,
            message_text: text.into(),
            time_posted_epoch: None,
        }
    }

    #[test]
    fn create_assigns_an_id_and_carries_the_epoch_through() {
        let db = test_db();
        let author = db.insert_account("alice", "pass1").unwrap();
        let service = MessageService::new(&db);

        let message = service
            .create(NewMessageRequest {
                posted_by: author,
                message_text: "hi".into(),
                time_posted_epoch: Some(1_700_000_000),
            })
            .unwrap();

        assert!(message.message_id > 0);
        assert_eq!(message.posted_by, author);
        assert_eq!(message.time_posted_epoch, Some(1_700_000_000));
    }

    #[test]
    fn create_rejects_blank_text() {
        let db = test_db();
        let author = db.insert_account("alice", "pass1").unwrap();
        let service = MessageService::new(&db);

        assert!(matches!(
            service.create(new_message(author, "")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            service.create(new_message(author, "   ")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn create_enforces_the_255_character_ceiling() {
        let db = test_db();
        let author = db.insert_account("alice", "pass1").unwrap();
        let service = MessageService::new(&db);

        assert!(service.create(new_message(author, &"x".repeat(255))).is_ok());
        assert!(matches!(
            service.create(new_message(author, &"x".repeat(256))),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_unknown_authors() {
        let db = test_db();
        let service = MessageService::new(&db);

        assert!(matches!(
            service.create(new_message(999, "hi")),
            Err(ApiError::UnknownAuthor(999))
        ));
    }

    #[test]
    fn absent_messages_read_as_none() {
        let db = test_db();
        let service = MessageService::new(&db);

        assert!(service.by_id(12345).unwrap().is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let db = test_db();
        let author = db.insert_account("alice", "pass1").unwrap();
        let service = MessageService::new(&db);

        let message = service.create(new_message(author, "bye")).unwrap();
        assert_eq!(service.delete(message.message_id).unwrap(), 1);
        assert_eq!(service.delete(message.message_id).unwrap(), 0);
    }

    #[test]
    fn update_replaces_text_and_nothing_else() {
        let db = test_db();
        let author = db.insert_account("alice", "pass1").unwrap();
        let service = MessageService::new(&db);

        let message = service
            .create(NewMessageRequest {
                posted_by: author,
                message_text: "draft".into(),
                time_posted_epoch: Some(7),
            })
            .unwrap();

        let updated = service
            .update_text(
                message.message_id,
                UpdateMessageRequest {
                    message_text: "final".into(),
                },
            )
            .unwrap();
        assert_eq!(updated, 1);

        let stored = service.by_id(message.message_id).unwrap().unwrap();
        assert_eq!(stored.message_text, "final");
        assert_eq!(stored.posted_by, author);
        assert_eq!(stored.time_posted_epoch, Some(7));
    }

    #[test]
    fn failed_update_leaves_the_message_unchanged() {
        let db = test_db();
        let author = db.insert_account("alice", "pass1").unwrap();
        let service = MessageService::new(&db);

        let message = service.create(new_message(author, "keep me")).unwrap();

        let result = service.update_text(
            message.message_id,
            UpdateMessageRequest {
                message_text: "  ".into(),
            },
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let stored = service.by_id(message.message_id).unwrap().unwrap();
        assert_eq!(stored.message_text, "keep me");
    }

    #[test]
    fn updating_a_missing_message_is_an_error() {
        let db = test_db();
        let service = MessageService::new(&db);

        assert!(matches!(
            service.update_text(
                999,
                UpdateMessageRequest {
                    message_text: "hello".into(),
                },
            ),
            Err(ApiError::MessageNotFound(999))
        ));
    }

    #[test]
    fn by_account_returns_only_that_authors_messages() {
        let db = test_db();
        let alice = db.insert_account("alice", "pass1").unwrap();
        let bob = db.insert_account("bob", "pass2").unwrap();
        let service = MessageService::new(&db);

        service.create(new_message(alice, "one")).unwrap();
        service.create(new_message(bob, "two")).unwrap();
        service.create(new_message(alice, "three")).unwrap();

        let messages = service.by_account(alice).unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.message_text.as_str()).collect();
        assert_eq!(texts, ["one", "three"]);

        assert!(service.by_account(999).unwrap().is_empty());
    }
}
