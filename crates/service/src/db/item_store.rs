use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use models::item::{self, Entity as ItemEntity, ItemChanges, NewItem};
use crate::errors::ServiceError;

/// List all items, newest first. Id breaks ties between equal timestamps.
pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<item::Model>, ServiceError> {
    let rows = ItemEntity::find()
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_item(db: &DatabaseConnection, id: i32) -> Result<Option<item::Model>, ServiceError> {
    let found = ItemEntity::find_by_id(id).one(db).await?;
    Ok(found)
}

/// Insert a validated item; id and created_at come from column defaults.
pub async fn create_item(db: &DatabaseConnection, new_item: NewItem) -> Result<item::Model, ServiceError> {
    let am = item::ActiveModel {
        name: Set(new_item.name),
        description: Set(Some(new_item.description)),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Apply only the supplied fields. `Ok(None)` if the row does not exist.
pub async fn update_item(
    db: &DatabaseConnection,
    id: i32,
    changes: ItemChanges,
) -> Result<Option<item::Model>, ServiceError> {
    let Some(existing) = ItemEntity::find_by_id(id).one(db).await? else { return Ok(None); };
    let mut am: item::ActiveModel = existing.into();
    if let Some(name) = changes.name { am.name = Set(name); }
    if let Some(description) = changes.description { am.description = Set(description); }
    match am.update(db).await {
        Ok(updated) => Ok(Some(updated)),
        // deleted between the lookup and the update
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete an item; returns true if deleted.
pub async fn delete_item(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = ItemEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn item_crud_against_postgres() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return Ok(());
            }
        };

        let created = create_item(&db, NewItem { name: "widget".into(), description: String::new() }).await?;
        let found = get_item(&db, created.id).await?.expect("created item");
        assert_eq!(found.name, "widget");
        assert_eq!(found.description.as_deref(), Some(""));

        let changes = ItemChanges { name: None, description: Some(Some("new".into())) };
        let updated = update_item(&db, created.id, changes).await?.expect("updated item");
        assert_eq!(updated.name, "widget");
        assert_eq!(updated.description.as_deref(), Some("new"));
        assert_eq!(updated.created_at, created.created_at);

        let list = list_items(&db).await?;
        assert!(list.iter().any(|x| x.id == created.id));

        assert!(delete_item(&db, created.id).await?);
        assert!(get_item(&db, created.id).await?.is_none());
        assert!(!delete_item(&db, created.id).await?);

        let missing = update_item(&db, created.id, ItemChanges { name: Some("x".into()), description: None }).await?;
        assert!(missing.is_none());
        Ok(())
    }
}
