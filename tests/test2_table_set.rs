mod common;

use common::{Backend, Person, backends, create_people, seed_people};
use sql_tableset::prelude::*;

#[tokio::test]
async fn table_set_operations_on_every_backend() -> Result<(), Box<dyn std::error::Error>> {
    for backend in backends() {
        run_backend(&backend)
            .await
            .map_err(|e| format!("{}: {e}", backend.name))?;
    }
    Ok(())
}

async fn run_backend(backend: &Backend) -> Result<(), TableSetError> {
    let ctx = DbContext::new(backend.config.clone());
    let table = "tableset_people";
    create_people(&ctx, table).await?;
    let people = seed_people(&ctx, table).await?;

    // generated keys are written back
    let mut ids: Vec<i64> = people.iter().map(|p| p.id).collect();
    assert!(ids.iter().all(|id| *id > 0), "{ids:?}");
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), people.len());

    check_reads(&ctx, table, &people).await?;
    check_paging(&ctx, table).await?;
    check_scalars(&ctx, table, &people).await?;
    check_writes(&ctx, table, &people).await?;
    check_retarget(&ctx, table).await?;
    check_malformed_filter(&ctx, table).await;
    Ok(())
}

async fn check_reads(ctx: &DbContext, table: &str, people: &[Person]) -> Result<(), TableSetError> {
    let mut all = ctx.table::<Person>(table);
    assert_eq!(all.count().await?, 5);
    assert!(all.is_exists().await?);

    let mut over_thirty = ctx
        .table::<Person>(table)
        .filter("age > ?", &[RowValues::Int(30)])
        .asc("age");
    let names: Vec<String> = over_thirty
        .to_list()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["bob", "cyd", "dee"]);
    assert_eq!(over_thirty.count().await?, 3);

    // filters are joined with AND
    let mut active_over_thirty = ctx
        .table::<Person>(table)
        .filter("age > ?", &[RowValues::Int(30)])
        .filter("active = ?", &[RowValues::Bool(true)])
        .desc("age");
    let found: Vec<Person> = active_over_thirty.to_list().await?;
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name, "dee");

    let mut nobody = ctx
        .table::<Person>(table)
        .filter("age > ?", &[RowValues::Int(200)]);
    assert_eq!(nobody.count().await?, 0);
    assert!(!nobody.is_exists().await?);
    assert_eq!(nobody.to_entity().await?, None);
    assert!(nobody.to_list().await?.is_empty());

    let cyd = ctx
        .table::<Person>(table)
        .filter("name = ?", &[RowValues::Text("cyd".into())])
        .to_entity()
        .await?;
    assert_eq!(cyd.as_ref(), people.iter().find(|p| p.name == "cyd"));

    // a partial select leaves unselected fields at their zero value
    let partial = ctx
        .table::<Person>(table)
        .select("id, name", &[])
        .filter("name = ?", &[RowValues::Text("ann".into())])
        .to_entity()
        .await?
        .unwrap_or_default();
    assert_eq!(partial.name, "ann");
    assert_eq!(partial.age, 0);
    Ok(())
}

async fn check_paging(ctx: &DbContext, table: &str) -> Result<(), TableSetError> {
    let mut by_id = ctx.table::<Person>(table).asc("id");

    let second = by_id.to_page_list(2, 2).await?;
    assert_eq!(second.total_count, 5);
    let names: Vec<&str> = second.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["cyd", "dee"]);

    let last = by_id.to_page_list(2, 3).await?;
    assert_eq!(last.len(), 1);
    assert_eq!(last.page_count(2), 3);

    // page 0 reads as page 1
    let zero = by_id.to_page_list(2, 0).await?;
    let first = by_id.to_page_list(2, 1).await?;
    assert_eq!(zero, first);

    let beyond = by_id.to_page_list(2, 10).await?;
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_count, 5);

    let filtered = ctx
        .table::<Person>(table)
        .filter("active = ?", &[RowValues::Bool(false)])
        .asc("id")
        .to_page_list(10, 1)
        .await?;
    assert_eq!(filtered.total_count, 2);
    assert_eq!(filtered.len(), 2);
    Ok(())
}

async fn check_scalars(
    ctx: &DbContext,
    table: &str,
    people: &[Person],
) -> Result<(), TableSetError> {
    let dee = people
        .iter()
        .find(|p| p.name == "dee")
        .cloned()
        .unwrap_or_default();
    let mut one = ctx
        .table::<Person>(table)
        .filter("id = ?", &[RowValues::Int(dee.id)]);

    assert_eq!(one.get_string("name").await?, "dee");
    assert_eq!(one.get_int("age").await?, 52);
    assert_eq!(one.get_long("id").await?, dee.id);
    assert!(one.get_bool("active").await?);
    assert!((one.get_float64("score").await? - 90.0).abs() < 1e-9);
    assert!((one.get_float32("score").await? - 90.0).abs() < 1e-6);
    assert_eq!(one.get_value("note").await?, Some(RowValues::Null));
    assert_eq!(one.get_string("note").await?, "");

    let mut none = ctx
        .table::<Person>(table)
        .filter("name = ?", &[RowValues::Text("nobody".into())]);
    assert_eq!(none.get_int("age").await?, 0);
    assert_eq!(none.get_long("id").await?, 0);
    assert_eq!(none.get_string("name").await?, "");
    assert!(!none.get_bool("active").await?);
    assert!(none.get_float64("score").await?.abs() < f64::EPSILON);
    assert_eq!(none.get_value("age").await?, None);

    let oldest = ctx
        .table::<Person>(table)
        .desc("age")
        .get_string("name")
        .await?;
    assert_eq!(oldest, "dee");
    Ok(())
}

async fn check_writes(ctx: &DbContext, table: &str, people: &[Person]) -> Result<(), TableSetError> {
    let mut ann = people
        .iter()
        .find(|p| p.name == "ann")
        .cloned()
        .unwrap_or_default();
    ann.age = 26;
    ann.note = Some("moved".into());
    let mut set = ctx.table::<Person>(table);
    assert_eq!(set.update(&ann).await?, 1);

    let mut by_id = ctx
        .table::<Person>(table)
        .filter("id = ?", &[RowValues::Int(ann.id)]);
    assert_eq!(by_id.get_int("age").await?, 26);
    assert_eq!(by_id.get_string("note").await?, "moved");

    // NULL columns are left alone by update
    ann.note = None;
    assert_eq!(set.update(&ann).await?, 1);
    assert_eq!(by_id.get_string("note").await?, "moved");

    // the accumulated filter narrows update by key
    let mut guarded = ctx
        .table::<Person>(table)
        .filter("age > ?", &[RowValues::Int(100)]);
    assert_eq!(guarded.update(&ann).await?, 0);

    let mut seniors = ctx
        .table::<Person>(table)
        .filter("age > ?", &[RowValues::Int(40)]);
    seniors.update_value("active", false).await?;
    let mut active = ctx
        .table::<Person>(table)
        .filter("active = ?", &[RowValues::Bool(true)]);
    assert_eq!(active.count().await?, 2);

    let mut eve = ctx
        .table::<Person>(table)
        .filter("name = ?", &[RowValues::Text("eve".into())]);
    assert_eq!(eve.delete().await?, 1);
    assert_eq!(eve.delete().await?, 0);

    let mut everyone = ctx.table::<Person>(table);
    assert_eq!(everyone.delete().await?, 4);
    assert_eq!(everyone.delete().await?, 0);
    assert_eq!(everyone.count().await?, 0);
    Ok(())
}

async fn check_retarget(ctx: &DbContext, table: &str) -> Result<(), TableSetError> {
    let archive = format!("{table}_archive");
    create_people(ctx, &archive).await?;
    let mut row = Person::new("old", 90, 1.0, false);
    ctx.table::<Person>(archive.as_str()).insert(&mut row).await?;

    let mut set = ctx.table::<Person>(table);
    assert_eq!(set.count().await?, 0);
    set.set_table_name(archive.as_str());
    assert_eq!(set.table_name(), archive);
    assert_eq!(set.count().await?, 1);
    assert_eq!(set.get_string("name").await?, "old");

    let mut back = set.table(table);
    assert_eq!(back.count().await?, 0);
    Ok(())
}

async fn check_malformed_filter(ctx: &DbContext, table: &str) {
    let mut broken = ctx
        .table::<Person>(table)
        .filter("age = = ?", &[RowValues::Int(1)]);
    let err = broken.count().await.unwrap_err();
    assert!(matches!(err, TableSetError::ExecutionError(_)), "{err:?}");
    let err = broken.to_list().await.unwrap_err();
    assert!(matches!(err, TableSetError::ExecutionError(_)), "{err:?}");
}
