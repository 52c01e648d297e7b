//! User Resource Routes
//!
//! The request-to-persistence mapping layer. Each handler extracts its
//! parameters, validates the input, runs one parameterized statement (or
//! one batch), and maps the outcome onto the response envelopes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use crate::db::{NewUser, StoreError, User, UserStore};

use super::errors::{ApiError, ApiResult};
use super::response::{Deletion, ItemBody, ListBody, WriteBody};

// ==================
// Shared State
// ==================

/// State shared across user handlers
#[derive(Clone)]
pub struct UserState {
    pub store: UserStore,
}

// ==================
// User Routes
// ==================

/// Create user routes
pub fn user_routes(state: UserState) -> Router {
    Router::new()
        .route("/", get(list_users_handler))
        .route("/", post(create_user_handler))
        .route("/multiple", post(create_many_handler))
        .route("/{id}", get(get_user_handler))
        .route("/{id}", put(update_user_handler))
        .route("/{id}", delete(delete_user_handler))
        .with_state(state)
}

// ==================
// Boundary Helpers
// ==================

/// Presence check for the two required fields.
fn validate_payload(user: &NewUser) -> ApiResult<()> {
    if user.name.is_empty() || user.email.is_empty() {
        return Err(ApiError::Validation(
            "name and email are required and must be non-empty".to_string(),
        ));
    }
    Ok(())
}

/// Unwrap a body extraction, classifying malformed JSON and wrong shapes
/// as validation failures.
fn require_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
}

/// Unwrap a path id extraction. Ids are canonically numeric; anything
/// else is a validation failure.
fn require_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
}

/// Map a write failure onto the closed error set.
///
/// Uniqueness is enforced by the storage constraint alone and classified
/// after the statement runs, so two concurrent writers cannot race a
/// pre-check.
fn classify_write_error(err: StoreError, email: &str) -> ApiError {
    match err {
        StoreError::UniqueViolation => ApiError::EmailConflict(email.to_string()),
        other => ApiError::Internal(other.to_string()),
    }
}

fn internal(err: StoreError) -> ApiError {
    ApiError::Internal(err.to_string())
}

// ==================
// Handlers
// ==================

async fn list_users_handler(State(state): State<UserState>) -> ApiResult<Json<ListBody>> {
    let users = state.store.list().map_err(internal)?;
    Ok(Json(ListBody::new(users)))
}

async fn get_user_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ItemBody>> {
    let id = require_id(path)?;

    let user = state
        .store
        .get(id)
        .map_err(internal)?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(ItemBody::new(user)))
}

async fn create_user_handler(
    State(state): State<UserState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WriteBody<User>>)> {
    let payload = require_body(body)?;
    validate_payload(&payload)?;

    let user = state
        .store
        .insert(&payload.name, &payload.email)
        .map_err(|e| classify_write_error(e, &payload.email))?;
    Ok((
        StatusCode::CREATED,
        Json(WriteBody::new("User created", user)),
    ))
}

async fn create_many_handler(
    State(state): State<UserState>,
    body: Result<Json<Vec<NewUser>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WriteBody<Vec<User>>>)> {
    let payload = require_body(body)?;
    if payload.is_empty() {
        return Err(ApiError::Validation(
            "request body must be a non-empty array of users".to_string(),
        ));
    }
    for user in &payload {
        validate_payload(user)?;
    }

    // The batch gives no per-row outcome, so a constraint failure inside
    // it is reported as a database error rather than a conflict.
    let users = state.store.insert_many(&payload).map_err(internal)?;
    Ok((
        StatusCode::CREATED,
        Json(WriteBody::new(
            format!("{} users created", users.len()),
            users,
        )),
    ))
}

async fn update_user_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<Json<WriteBody<User>>> {
    let id = require_id(path)?;
    let payload = require_body(body)?;
    validate_payload(&payload)?;

    let affected = state
        .store
        .update(id, &payload.name, &payload.email)
        .map_err(|e| classify_write_error(e, &payload.email))?;
    if affected == 0 {
        return Err(ApiError::NotFound(id));
    }

    let user = User {
        id,
        name: payload.name,
        email: payload.email,
    };
    Ok(Json(WriteBody::new("User updated", user)))
}

async fn delete_user_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<WriteBody<Deletion>>> {
    let id = require_id(path)?;

    let affected = state.store.delete(id).map_err(internal)?;
    if affected == 0 {
        return Err(ApiError::NotFound(id));
    }

    Ok(Json(WriteBody::new(
        "User deleted",
        Deletion {
            id,
            deleted_rows: affected,
        },
    )))
}
