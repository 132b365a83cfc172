// MySQL backend
//
// - config: bb8 connection manager over mysql_async and pool setup
// - params: conversion of `RowValues` into positional mysql_async parameters
// - query: result extraction and statement execution

pub mod config;
pub mod params;
pub mod query;

pub use config::MysqlManager;
pub use params::Params;
pub use query::{execute_batch, execute_dml, execute_insert_last_id, execute_select};
