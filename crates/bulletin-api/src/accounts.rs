use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use bulletin_db::Database;
use bulletin_types::api::{LoginRequest, RegisterRequest};
use bulletin_types::models::Account;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Registration and login rules: input validation plus account lookups
/// against the store. Blocking — handlers hop onto a blocking thread.
pub struct AccountService<'a> {
    db: &'a Database,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn register(&self, req: RegisterRequest) -> Result<Account, ApiError> {
        if req.username.trim().is_empty() {
            return Err(ApiError::Validation("username cannot be blank"));
        }
        if req.password.chars().count() < 4 {
            return Err(ApiError::Validation(
                "password must be at least 4 characters long",
            ));
        }

        // Lookup first so a taken username surfaces as a typed duplicate;
        // the UNIQUE constraint still backstops concurrent registrations.
        if self.db.get_account_by_username(&req.username)?.is_some() {
            return Err(ApiError::DuplicateUsername);
        }

        let account_id = self.db.insert_account(&req.username, &req.password)?;

        Ok(Account {
            account_id,
            username: req.username,
            password: req.password,
        })
    }

    pub fn login(&self, req: LoginRequest) -> Result<Account, ApiError> {
        if req.username.trim().is_empty() {
            return Err(ApiError::Unauthorized("blank username"));
        }

        let row = self
            .db
            .get_account_by_username(&req.username)?
            .ok_or(ApiError::Unauthorized("unknown username"))?;

        // Passwords are stored in clear text; login is literal equality.
        if row.password != req.password {
            return Err(ApiError::Unauthorized("password mismatch"));
        }

        Ok(Account {
            account_id: row.account_id,
            username: row.username,
            password: row.password,
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account =
        tokio::task::spawn_blocking(move || AccountService::new(&state.db).register(req))
            .await
            .map_err(join_error)??;

    Ok(Json(account))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = tokio::task::spawn_blocking(move || AccountService::new(&state.db).login(req))
        .await
        .map_err(join_error)??;

    Ok(Json(account))
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", e);
    ApiError::Db(anyhow::anyhow!(e))
}
