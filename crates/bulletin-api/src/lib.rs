pub mod accounts;
pub mod error;
pub mod messages;

use axum::{
    Router,
    routing::{get, post},
};

pub use accounts::{AppState, AppStateInner};

/// Full route table. Middleware layers (CORS, request tracing) are applied
/// by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route(
            "/messages",
            get(messages::get_all_messages).post(messages::create_message),
        )
        .route(
            "/messages/{message_id}",
            get(messages::get_message_by_id)
                .patch(messages::update_message)
                .delete(messages::delete_message),
        )
        .route(
            "/accounts/{account_id}/messages",
            get(messages::get_messages_by_account),
        )
        .with_state(state)
}
