//! SQLite-backed store for the `users` table.
//!
//! The schema is applied on open, so a freshly created database file is
//! immediately serveable. Uniqueness of `email` is enforced by the UNIQUE
//! constraint alone; callers observe violations as
//! [`StoreError::UniqueViolation`](super::errors::StoreError) after the
//! statement runs, never through a pre-check.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::StoreResult;

/// A stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Input for user creation and update.
///
/// Doubles as the request body schema; unknown fields are rejected at the
/// boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Shared handle to the embedded `users` table.
///
/// The connection lives behind a mutex and the handle is cloned into each
/// request handler; there is no process-global connection.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        debug!("opened user store at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            );
            ",
        )?;
        Ok(())
    }

    /// Returns every stored user ordered by id.
    pub fn list(&self) -> StoreResult<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Looks up a single user. At most one row matches, since id is unique.
    pub fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, email FROM users WHERE id = ?1")?;
        match stmt.query_row(params![id], row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts a new user and returns it with the assigned id.
    pub fn insert(&self, name: &str, email: &str) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "inserted user");
        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Inserts all rows inside a single transaction, returning them in
    /// input order with their assigned ids.
    ///
    /// Any failure rolls the whole batch back; concurrent readers never
    /// observe a partially applied batch.
    pub fn insert_many(&self, users: &[NewUser]) -> StoreResult<Vec<User>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let mut inserted = Vec::with_capacity(users.len());
        for user in users {
            tx.execute(
                "INSERT INTO users (name, email) VALUES (?1, ?2)",
                params![user.name, user.email],
            )?;
            inserted.push(User {
                id: tx.last_insert_rowid(),
                name: user.name.clone(),
                email: user.email.clone(),
            });
        }

        tx.commit()?;
        debug!(count = inserted.len(), "inserted user batch");
        Ok(inserted)
    }

    /// Updates name and email in place. Returns the affected-row count;
    /// zero means no row matched the id.
    pub fn update(&self, id: i64, name: &str, email: &str) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
            params![name, email, id],
        )?;
        Ok(affected)
    }

    /// Deletes the row matching id. Returns the affected-row count;
    /// zero means no row matched.
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}
