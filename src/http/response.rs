//! # Response Envelopes
//!
//! Success envelope types for the user API. Every success body carries
//! `success: true`; failures are rendered by
//! [`ApiError`](super::errors::ApiError).

use serde::Serialize;

use crate::db::User;

/// Envelope for the unbounded user listing, with an explicit count
#[derive(Debug, Clone, Serialize)]
pub struct ListBody {
    pub success: bool,
    pub data: Vec<User>,
    pub count: usize,
}

impl ListBody {
    pub fn new(data: Vec<User>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            count,
        }
    }
}

/// Envelope for a single fetched user
#[derive(Debug, Clone, Serialize)]
pub struct ItemBody {
    pub success: bool,
    pub data: User,
}

impl ItemBody {
    pub fn new(data: User) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Envelope for writes, carrying a human-readable message
#[derive(Debug, Clone, Serialize)]
pub struct WriteBody<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> WriteBody<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Payload reported by a successful delete
#[derive(Debug, Clone, Serialize)]
pub struct Deletion {
    pub id: i64,
    #[serde(rename = "deletedRows")]
    pub deleted_rows: usize,
}
