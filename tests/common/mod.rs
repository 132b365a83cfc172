#![allow(dead_code)]

use sql_tableset::prelude::*;
use tempfile::TempDir;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub score: f64,
    pub active: bool,
    pub note: Option<String>,
}

impl Person {
    pub fn new(name: &str, age: i32, score: f64, active: bool) -> Self {
        Self {
            name: name.to_string(),
            age,
            score,
            active,
            ..Self::default()
        }
    }
}

impl Record for Person {
    fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
        Ok(Person {
            id: row.get_as("id")?,
            name: row.get_as("name")?,
            age: row.get_as("age")?,
            score: row.get_as("score")?,
            active: row.get_as("active")?,
            note: row.get_as("note")?,
        })
    }

    fn to_values(&self) -> Vec<(&'static str, RowValues)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("age", self.age.into()),
            ("score", self.score.into()),
            ("active", self.active.into()),
            ("note", self.note.clone().into()),
        ]
    }

    fn set_generated_key(&mut self, key: i64) {
        self.id = key;
    }
}

/// A configured database plus whatever keeps it alive for the test.
pub struct Backend {
    pub name: &'static str,
    pub config: DbConfig,
    _dir: Option<TempDir>,
}

pub fn sqlite_backend() -> Backend {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tableset.db");
    Backend {
        name: "sqlite",
        config: DbConfig::new("sqlite", path.to_string_lossy().into_owned()).with_pool_bounds(1, 4),
        _dir: Some(dir),
    }
}

fn env_backend(name: &'static str, kind: &str, var: &str) -> Option<Backend> {
    let connection_string = std::env::var(var).ok().filter(|v| !v.trim().is_empty())?;
    Some(Backend {
        name,
        config: DbConfig::new(kind, connection_string).with_pool_bounds(1, 4),
        _dir: None,
    })
}

/// `PostgreSQL` from `TABLESET_PG_URL`, when exported.
#[cfg(feature = "postgres")]
pub fn postgres_backend() -> Option<Backend> {
    env_backend("postgres", "postgresql", "TABLESET_PG_URL")
}

/// `SQLite` always; the server backends only when their feature is enabled
/// and their connection string is exported.
#[allow(unused_mut)]
pub fn backends() -> Vec<Backend> {
    let mut list = vec![sqlite_backend()];
    #[cfg(feature = "postgres")]
    list.extend(postgres_backend());
    #[cfg(feature = "mysql")]
    list.extend(env_backend("mysql", "mysql", "TABLESET_MYSQL_URL"));
    #[cfg(feature = "mssql")]
    list.extend(env_backend("mssql", "sqlserver", "TABLESET_MSSQL_ADO"));
    list
}

/// Statements that drop and recreate a `people`-shaped table.
pub fn people_schema(dialect: Dialect, table: &str) -> Vec<String> {
    match dialect {
        Dialect::Sqlite => vec![
            format!("DROP TABLE IF EXISTS {table}"),
            format!(
                "CREATE TABLE {table} (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, \
                 age INTEGER NOT NULL, score REAL NOT NULL, active INTEGER NOT NULL, note TEXT)"
            ),
        ],
        Dialect::Postgres => vec![
            format!("DROP TABLE IF EXISTS {table}"),
            format!(
                "CREATE TABLE {table} (id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, \
                 age INTEGER NOT NULL, score DOUBLE PRECISION NOT NULL, active BOOLEAN NOT NULL, note TEXT)"
            ),
        ],
        Dialect::Mysql => vec![
            format!("DROP TABLE IF EXISTS {table}"),
            format!(
                "CREATE TABLE {table} (id BIGINT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(100) NOT NULL, \
                 age INT NOT NULL, score DOUBLE NOT NULL, active BOOLEAN NOT NULL, note TEXT)"
            ),
        ],
        Dialect::Mssql => vec![
            format!("IF OBJECT_ID('{table}', 'U') IS NOT NULL DROP TABLE {table}"),
            format!(
                "CREATE TABLE {table} (id BIGINT IDENTITY(1,1) PRIMARY KEY, name NVARCHAR(100) NOT NULL, \
                 age INT NOT NULL, score FLOAT NOT NULL, active BIT NOT NULL, note NVARCHAR(MAX))"
            ),
        ],
    }
}

pub async fn create_people(ctx: &DbContext, table: &str) -> Result<(), TableSetError> {
    for sql in people_schema(ctx.dialect()?, table) {
        ctx.execute_batch(&sql).await?;
    }
    Ok(())
}

/// Insert the standard five people, returning them with their generated ids.
pub async fn seed_people(ctx: &DbContext, table: &str) -> Result<Vec<Person>, TableSetError> {
    let mut people = vec![
        Person::new("ann", 25, 71.5, true),
        Person::new("bob", 34, 64.0, true),
        Person::new("cyd", 41, 88.25, false),
        Person::new("dee", 52, 90.0, true),
        Person::new("eve", 19, 55.5, false),
    ];
    let mut set = ctx.table::<Person>(table);
    for person in &mut people {
        let inserted = set.insert(person).await?;
        assert_eq!(inserted, 1);
    }
    Ok(people)
}
