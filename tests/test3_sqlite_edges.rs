#![cfg(feature = "sqlite")]

mod common;

use common::{Person, create_people, sqlite_backend};
use sql_tableset::prelude::*;

#[derive(Debug, Default, PartialEq)]
struct Setting {
    key: String,
    value: String,
}

impl Record for Setting {
    fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
        Ok(Setting {
            key: row.get_as("key")?,
            value: row.get_as("value")?,
        })
    }

    fn to_values(&self) -> Vec<(&'static str, RowValues)> {
        vec![
            ("key", self.key.clone().into()),
            ("value", self.value.clone().into()),
        ]
    }

    fn primary_key() -> &'static str {
        "key"
    }

    fn auto_generated_key() -> bool {
        false
    }
}

#[tokio::test]
async fn natural_keys_are_written_as_given() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    ctx.execute_batch("CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT NOT NULL)")
        .await?;

    let mut settings = ctx.table::<Setting>("settings");
    let mut theme = Setting {
        key: "theme".into(),
        value: "dark".into(),
    };
    assert_eq!(settings.insert(&mut theme).await?, 1);

    theme.value = "light".into();
    assert_eq!(settings.update(&theme).await?, 1);
    assert_eq!(settings.to_entity().await?, Some(theme));
    Ok(())
}

#[tokio::test]
async fn explicit_generated_key_is_kept() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    create_people(&ctx, "people").await?;

    let mut person = Person::new("kim", 30, 1.0, true);
    person.id = 40;
    ctx.table::<Person>("people").insert(&mut person).await?;
    assert_eq!(person.id, 40);

    let mut next = Person::new("lee", 31, 2.0, true);
    ctx.table::<Person>("people").insert(&mut next).await?;
    assert_eq!(next.id, 41);
    Ok(())
}

#[tokio::test]
async fn failed_open_is_replayed_without_reopening() {
    let ctx = DbContext::new(DbConfig::new("sqlite", "/nonexistent-dir/for/sure/app.db"));
    let mut people = ctx.table::<Person>("people");

    let first = people.count().await.unwrap_err();
    assert!(matches!(first, TableSetError::ConnectionError(_)), "{first}");
    assert!(first.is_open_failure());

    let second = people.to_list().await.unwrap_err();
    assert!(
        matches!(second, TableSetError::HandleUnavailable(ref msg) if msg == &first.to_string()),
        "{second}"
    );
    assert!(matches!(
        people.get_int("age").await,
        Err(TableSetError::HandleUnavailable(_))
    ));
}

#[tokio::test]
async fn unknown_kind_fails_every_operation() {
    let ctx = DbContext::new(DbConfig::new("oracle", "whatever"));
    let mut people = ctx.table::<Person>("people");
    assert!(matches!(
        people.count().await,
        Err(TableSetError::UnsupportedDatabase(_))
    ));
    assert!(matches!(
        people.delete().await,
        Err(TableSetError::HandleUnavailable(_))
    ));
}

#[tokio::test]
async fn empty_table_name_is_rejected() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    let mut unnamed = ctx.table::<Person>("");
    assert!(matches!(
        unnamed.to_list().await,
        Err(TableSetError::ConfigError(_))
    ));

    create_people(&ctx, "people").await?;
    unnamed.set_table_name("people");
    assert!(unnamed.to_list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_filter_surfaces_as_driver_error() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    create_people(&ctx, "people").await?;

    let mut broken = ctx
        .table::<Person>("people")
        .filter("age = = ?", &[RowValues::Int(1)]);
    assert!(matches!(
        broken.count().await,
        Err(TableSetError::ExecutionError(_))
    ));
    assert!(matches!(
        ctx.execute_batch("CREATE TABLE (").await,
        Err(TableSetError::ExecutionError(_))
    ));
    Ok(())
}

#[tokio::test]
async fn update_requires_a_key_value() -> Result<(), TableSetError> {
    #[derive(Default)]
    struct Keyless {
        name: String,
    }
    impl Record for Keyless {
        fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
            Ok(Keyless {
                name: row.get_as("name")?,
            })
        }
        fn to_values(&self) -> Vec<(&'static str, RowValues)> {
            vec![("name", self.name.clone().into())]
        }
    }

    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    create_people(&ctx, "people").await?;
    let err = ctx
        .table::<Keyless>("people")
        .update(&Keyless::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TableSetError::ConfigError(_)), "{err}");

    #[derive(Default)]
    struct Draft {
        id: Option<i64>,
        name: String,
    }
    impl Record for Draft {
        fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
            Ok(Draft {
                id: row.get_as("id")?,
                name: row.get_as("name")?,
            })
        }
        fn to_values(&self) -> Vec<(&'static str, RowValues)> {
            vec![("id", self.id.into()), ("name", self.name.clone().into())]
        }
    }

    common::seed_people(&ctx, "people").await?;
    let draft = Draft {
        id: None,
        name: "zed".into(),
    };
    let mut drafts = ctx.table::<Draft>("people");
    let err = drafts.update(&draft).await.unwrap_err();
    assert!(matches!(err, TableSetError::ConfigError(_)), "{err}");
    assert_eq!(
        ctx.table::<Person>("people")
            .filter("name = ?", &[RowValues::Text("zed".into())])
            .count()
            .await?,
        0
    );
    Ok(())
}

#[tokio::test]
async fn connections_honour_the_requested_key_retrieval() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    create_people(&ctx, "people").await?;
    let handle = ctx.open().await?;
    let mut conn = handle.get_connection().await?;

    let returned = conn
        .insert_returning(
            "INSERT INTO people (name, age, score, active) VALUES (?1, ?2, ?3, ?4) RETURNING id",
            &[
                RowValues::Text("ann".into()),
                RowValues::Int(25),
                RowValues::Float(1.0),
                RowValues::Bool(true),
            ],
            KeyRetrieval::Returning,
        )
        .await?;
    assert_eq!(returned.rows_affected, 1);
    assert_eq!(returned.key, Some(1));

    let last_id = conn
        .insert_returning(
            "INSERT INTO people (name, age, score, active) VALUES (?1, ?2, ?3, ?4)",
            &[
                RowValues::Text("bob".into()),
                RowValues::Int(34),
                RowValues::Float(2.0),
                RowValues::Bool(true),
            ],
            KeyRetrieval::LastInsertId,
        )
        .await?;
    assert_eq!(last_id.rows_affected, 1);
    assert_eq!(last_id.key, Some(2));
    Ok(())
}

#[test]
fn rendered_select_reflects_chained_clauses() -> Result<(), TableSetError> {
    let ctx = DbContext::new(DbConfig::new("sqlite", "unused.db"));
    let people = ctx
        .table::<Person>("people")
        .select("id, name", &[])
        .filter("age between ? and ?", &[RowValues::Int(20), RowValues::Int(30)])
        .filter("active = ?", &[RowValues::Bool(true)])
        .desc("age")
        .asc("name");

    assert_eq!(people.statement().filters().len(), 2);
    assert_eq!(people.statement().orders(), ["age desc", "name asc"]);

    let pg = people.rendered_select(Dialect::Postgres)?;
    assert_eq!(
        pg.sql,
        r#"SELECT id, name FROM "people" WHERE (age between $1 and $2) AND (active = $3) ORDER BY age desc, name asc"#
    );
    assert_eq!(pg.params.len(), 3);

    let mssql = people.rendered_select(Dialect::Mssql)?;
    assert_eq!(
        mssql.sql,
        "SELECT id, name FROM [people] WHERE (age between @P1 and @P2) AND (active = @P3) ORDER BY age desc, name asc"
    );
    Ok(())
}

#[tokio::test]
async fn page_list_serializes_for_callers() -> Result<(), Box<dyn std::error::Error>> {
    #[derive(Debug, Default, serde::Serialize)]
    struct Name {
        name: String,
    }
    impl Record for Name {
        fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
            Ok(Name {
                name: row.get_as("name")?,
            })
        }
        fn to_values(&self) -> Vec<(&'static str, RowValues)> {
            vec![("name", self.name.clone().into())]
        }
    }

    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    common::create_people(&ctx, "people").await?;
    common::seed_people(&ctx, "people").await?;

    let page = ctx
        .table::<Name>("people")
        .select("name", &[])
        .asc("name")
        .to_page_list(2, 1)
        .await?;
    assert_eq!(
        serde_json::to_value(&page)?,
        serde_json::json!({"items": [{"name": "ann"}, {"name": "bob"}], "total_count": 5})
    );
    Ok(())
}

#[tokio::test]
async fn scalar_reads_distinguish_null_from_missing() -> Result<(), TableSetError> {
    let backend = sqlite_backend();
    let ctx = DbContext::new(backend.config.clone());
    create_people(&ctx, "people").await?;
    common::seed_people(&ctx, "people").await?;

    let mut ann = ctx
        .table::<Person>("people")
        .filter("name = ?", &[RowValues::Text("ann".into())]);
    assert_eq!(ann.get_value("note").await?, Some(RowValues::Null));
    assert_eq!(ann.get_scalar::<Option<String>>("note").await?, None);
    assert_eq!(ann.get_scalar::<Option<i64>>("age").await?, Some(25));

    let mut nobody = ctx
        .table::<Person>("people")
        .filter("name = ?", &[RowValues::Text("zed".into())]);
    assert_eq!(nobody.get_value("note").await?, None);
    assert_eq!(nobody.get_string("name").await?, "");
    Ok(())
}
