//! roster - a minimal, self-hostable user directory service
//!
//! Exposes CRUD over a single `users` table through an HTTP API,
//! backed by an embedded SQLite store.

pub mod cli;
pub mod db;
pub mod http;
