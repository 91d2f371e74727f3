use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::db::connect;
use crate::item;

/// Inserted rows get their id and created_at from the database
#[tokio::test]
async fn test_item_insert_uses_column_defaults() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(());
        }
    };
    Migrator::up(&db, None).await?;

    let am = item::ActiveModel {
        name: Set("entity_test".to_string()),
        description: Set(None),
        ..Default::default()
    };
    let created = am.insert(&db).await?;
    assert!(created.id > 0);
    assert_eq!(created.description, None);

    let found = item::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|m| m.created_at), Some(created.created_at));

    item::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Names have no length cap beyond what the validator enforces
#[tokio::test]
async fn test_item_long_name_is_stored() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(());
        }
    };
    Migrator::up(&db, None).await?;

    let long_name = "n".repeat(1_000);
    let am = item::ActiveModel {
        name: Set(long_name.clone()),
        description: Set(Some(String::new())),
        ..Default::default()
    };
    let created = am.insert(&db).await?;
    assert_eq!(created.name, long_name);

    item::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}
