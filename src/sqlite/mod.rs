// SQLite backend
//
// - config: bb8 connection manager, pool setup and the blocking-worker hop
// - params: conversion of `RowValues` into rusqlite values
// - query: result extraction and statement execution

pub mod config;
pub mod params;
pub mod query;

pub use config::{SharedSqliteConnection, SqliteManager};
pub use params::Params;
pub use query::{execute_batch, execute_dml, execute_insert_last_id, execute_select};
