// PostgreSQL backend
//
// - config: bb8 connection manager and pool setup
// - decode: wire decoding for numeric and otherwise unmapped column types
// - params: conversion of `RowValues` into tokio-postgres parameters
// - query: result extraction and statement execution

pub mod config;
pub mod decode;
pub mod params;
pub mod query;

pub use config::PgManager;
pub use params::Params;
pub use query::{execute_batch, execute_dml, execute_select};
