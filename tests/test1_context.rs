#![cfg(feature = "sqlite")]

mod common;

use std::time::Duration;

use common::{Person, sqlite_backend};
use sql_tableset::prelude::*;

#[test]
fn dialect_resolution_in_any_case() -> Result<(), TableSetError> {
    for (kind, expected) in [
        ("sqlite", Dialect::Sqlite),
        ("SQLite", Dialect::Sqlite),
        ("SQLITE", Dialect::Sqlite),
    ] {
        let ctx = DbContext::new(DbConfig::new(kind, "unused.db"));
        assert_eq!(ctx.dialect()?, expected);
    }
    for kind in ["mysql", "MySql", "postgresql", "POSTGRESQL", "sqlserver", "SqlServer"] {
        assert!(Dialect::from_kind(kind).is_ok(), "{kind}");
    }
    for kind in ["oracle", "db2", "", "postgres"] {
        let ctx = DbContext::new(DbConfig::new(kind, "unused"));
        assert!(
            matches!(ctx.dialect(), Err(TableSetError::UnsupportedDatabase(_))),
            "{kind}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn opened_pool_carries_configured_limits() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let config = backend.config.clone().with_pool_bounds(2, 5);
    let ctx = DbContext::new(config);

    let handle = ctx.open().await?;
    let settings = handle.pool_settings();
    assert_eq!(settings.min_idle, Some(2));
    assert_eq!(settings.max_open, Some(5));
    assert_eq!(settings.max_lifetime, Duration::from_secs(60 * 60));
    assert_eq!(handle.dialect(), Dialect::Sqlite);
    assert!(handle.pool().status().connections >= 2);
    Ok(())
}

#[tokio::test]
async fn zero_bounds_leave_pool_defaults() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let config = backend.config.clone().with_pool_bounds(0, 0);
    let handle = DbContext::new(config).open().await?;
    assert_eq!(handle.pool_settings().min_idle, None);
    assert_eq!(handle.pool_settings().max_open, None);
    Ok(())
}

#[tokio::test]
async fn min_without_max_grows_the_pool() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let config = backend.config.clone().with_pool_bounds(15, 0);
    let handle = DbContext::new(config).open().await?;
    assert_eq!(handle.pool_settings().min_idle, Some(15));
    assert_eq!(handle.pool_settings().max_open, None);

    let mut held = Vec::new();
    for _ in 0..12 {
        held.push(handle.get_connection().await?);
    }
    assert!(handle.pool().status().connections >= 12);
    Ok(())
}

#[tokio::test]
async fn min_above_max_fails_at_open() {
    let backend = sqlite_backend();
    let config = backend.config.clone().with_pool_bounds(6, 3);
    let err = DbContext::new(config).open().await.unwrap_err();
    assert!(matches!(err, TableSetError::ConfigError(_)), "{err}");
}

#[tokio::test]
async fn accessors_share_one_pool() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    assert!(!ctx.is_open());

    common::create_people(&ctx, "people").await?;
    assert!(ctx.is_open());

    let mut first = ctx.table::<Person>("people");
    let mut second = ctx.clone().table::<Person>("people");
    let a = first.handle().await?;
    let b = second.handle().await?;
    assert_eq!(a.pool_settings(), b.pool_settings());
    assert_eq!(first.count().await?, 0);
    assert_eq!(second.count().await?, 0);
    Ok(())
}
