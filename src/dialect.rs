use std::fmt::Write;

use crate::config::PoolSettings;
use crate::error::TableSetError;
use crate::pool::MiddlewarePool;
use crate::translation::PlaceholderStyle;
use crate::types::DatabaseType;

/// The SQL variant spoken by one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Mysql,
    Postgres,
    Sqlite,
    Mssql,
}

/// How an insert learns the key the database generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRetrieval {
    /// `INSERT ... RETURNING key`
    Returning,
    /// `INSERT ... OUTPUT INSERTED.key VALUES ...`
    OutputInserted,
    /// Read the connection's last insert id after executing.
    LastInsertId,
}

impl Dialect {
    /// Resolve a configured backend kind (case-insensitive).
    ///
    /// # Errors
    /// Returns `TableSetError::UnsupportedDatabase` for an unknown kind.
    pub fn from_kind(kind: &str) -> Result<Self, TableSetError> {
        kind.parse::<DatabaseType>().map(Self::from)
    }

    /// Whether the driver for this dialect was compiled into the current build.
    #[must_use]
    pub fn is_compiled_in(self) -> bool {
        match self {
            Dialect::Mysql => cfg!(feature = "mysql"),
            Dialect::Postgres => cfg!(feature = "postgres"),
            Dialect::Sqlite => cfg!(feature = "sqlite"),
            Dialect::Mssql => cfg!(feature = "mssql"),
        }
    }

    #[must_use]
    pub fn database_type(self) -> DatabaseType {
        match self {
            Dialect::Mysql => DatabaseType::Mysql,
            Dialect::Postgres => DatabaseType::Postgresql,
            Dialect::Sqlite => DatabaseType::Sqlite,
            Dialect::Mssql => DatabaseType::Sqlserver,
        }
    }

    #[must_use]
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Dialect::Mysql => PlaceholderStyle::Mysql,
            Dialect::Postgres => PlaceholderStyle::Postgres,
            Dialect::Sqlite => PlaceholderStyle::Sqlite,
            Dialect::Mssql => PlaceholderStyle::Mssql,
        }
    }

    #[must_use]
    pub fn key_retrieval(self) -> KeyRetrieval {
        match self {
            Dialect::Mysql => KeyRetrieval::LastInsertId,
            Dialect::Postgres | Dialect::Sqlite => KeyRetrieval::Returning,
            Dialect::Mssql => KeyRetrieval::OutputInserted,
        }
    }

    /// Quote a table or column name, segment by segment for dotted names.
    ///
    /// Names that already contain quoting, whitespace or parentheses are
    /// treated as expressions and returned unchanged.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        let raw = name.trim();
        if raw.is_empty()
            || raw
                .chars()
                .any(|c| matches!(c, '"' | '`' | '[' | ']' | '(' | ')' | '*') || c.is_whitespace())
        {
            return raw.to_string();
        }

        let (open, close) = match self {
            Dialect::Mysql => ('`', '`'),
            Dialect::Postgres | Dialect::Sqlite => ('"', '"'),
            Dialect::Mssql => ('[', ']'),
        };
        let mut out = String::with_capacity(raw.len() + 4);
        for (i, segment) in raw.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push(open);
            out.push_str(segment);
            out.push(close);
        }
        out
    }

    /// Row-limiting tail appended after the ORDER BY clause.
    ///
    /// SQL Server needs an ORDER BY for OFFSET/FETCH, so an unordered query gets
    /// `ORDER BY (SELECT NULL)`.
    #[must_use]
    pub fn limit_clause(self, limit: Option<u64>, offset: Option<u64>, ordered: bool) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        match self {
            Dialect::Mssql => {
                if limit.is_none() && offset.is_none() {
                    return out;
                }
                if !ordered {
                    out.push_str(" ORDER BY (SELECT NULL)");
                }
                let _ = write!(out, " OFFSET {} ROWS", offset.unwrap_or(0));
                if let Some(limit) = limit {
                    let _ = write!(out, " FETCH NEXT {limit} ROWS ONLY");
                }
            }
            Dialect::Mysql | Dialect::Postgres | Dialect::Sqlite => {
                match (limit, offset) {
                    (Some(limit), _) => {
                        let _ = write!(out, " LIMIT {limit}");
                    }
                    (None, Some(_)) => match self {
                        Dialect::Mysql => out.push_str(" LIMIT 18446744073709551615"),
                        Dialect::Sqlite => out.push_str(" LIMIT -1"),
                        _ => {}
                    },
                    (None, None) => {}
                }
                if let Some(offset) = offset {
                    let _ = write!(out, " OFFSET {offset}");
                }
            }
        }
        out
    }

    /// Open a connection pool for this dialect.
    ///
    /// # Errors
    /// Returns `TableSetError::ConnectionError` if the connection string is
    /// invalid or the first connection cannot be established, and
    /// `TableSetError::Unimplemented` if the backend was not compiled in.
    pub async fn open(
        self,
        connection_string: &str,
        settings: &PoolSettings,
    ) -> Result<MiddlewarePool, TableSetError> {
        settings.validate()?;
        match self {
            #[cfg(feature = "mysql")]
            Dialect::Mysql => crate::mysql::config::open_pool(connection_string, settings).await,
            #[cfg(feature = "postgres")]
            Dialect::Postgres => {
                crate::postgres::config::open_pool(connection_string, settings).await
            }
            #[cfg(feature = "sqlite")]
            Dialect::Sqlite => crate::sqlite::config::open_pool(connection_string, settings).await,
            #[cfg(feature = "mssql")]
            Dialect::Mssql => crate::mssql::config::open_pool(connection_string, settings).await,
            #[allow(unreachable_patterns)]
            _ => {
                let _ = connection_string;
                Err(TableSetError::Unimplemented(format!(
                    "{} support is not enabled in the current build",
                    self.database_type()
                )))
            }
        }
    }
}

impl From<DatabaseType> for Dialect {
    fn from(kind: DatabaseType) -> Self {
        match kind {
            DatabaseType::Mysql => Dialect::Mysql,
            DatabaseType::Postgresql => Dialect::Postgres,
            DatabaseType::Sqlite => Dialect::Sqlite,
            DatabaseType::Sqlserver => Dialect::Mssql,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_kind_in_any_case() {
        let cases = [
            ("mysql", Dialect::Mysql),
            ("MYSQL", Dialect::Mysql),
            ("postgresql", Dialect::Postgres),
            ("PostgreSQL", Dialect::Postgres),
            ("sqlite", Dialect::Sqlite),
            ("Sqlite", Dialect::Sqlite),
            ("sqlserver", Dialect::Mssql),
            ("SQLServer", Dialect::Mssql),
        ];
        for (kind, expected) in cases {
            assert_eq!(Dialect::from_kind(kind).unwrap(), expected, "{kind}");
        }
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        for kind in ["oracle", "", "pg", "sql server"] {
            assert!(matches!(
                Dialect::from_kind(kind),
                Err(TableSetError::UnsupportedDatabase(_))
            ));
        }
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(Dialect::Postgres.quote_identifier("users"), "\"users\"");
        assert_eq!(Dialect::Mysql.quote_identifier("app.users"), "`app`.`users`");
        assert_eq!(Dialect::Mssql.quote_identifier("dbo.users"), "[dbo].[users]");
        assert_eq!(Dialect::Sqlite.quote_identifier("users u"), "users u");
    }

    #[test]
    fn limit_clauses() {
        assert_eq!(
            Dialect::Postgres.limit_clause(Some(10), Some(20), false),
            " LIMIT 10 OFFSET 20"
        );
        assert_eq!(Dialect::Sqlite.limit_clause(None, Some(5), true), " LIMIT -1 OFFSET 5");
        assert_eq!(Dialect::Mysql.limit_clause(Some(1), None, false), " LIMIT 1");
        assert_eq!(
            Dialect::Mssql.limit_clause(Some(10), Some(0), false),
            " ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(
            Dialect::Mssql.limit_clause(Some(1), None, true),
            " OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
        );
        assert_eq!(Dialect::Mssql.limit_clause(None, None, false), "");
    }

    #[cfg(not(feature = "mssql"))]
    #[tokio::test]
    async fn disabled_backend_is_unimplemented() {
        let settings = crate::config::DbConfig::new("sqlserver", "").pool_settings();
        let err = Dialect::Mssql.open("", &settings).await.unwrap_err();
        assert!(matches!(err, TableSetError::Unimplemented(_)));
    }
}
