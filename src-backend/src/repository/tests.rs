//! Repository Integration Tests
//!
//! Tests for ShelfRepository and ItemRepository with in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, Item, Shelf};
    use crate::repository::{init_db, ItemRepository, Repository, SearchableRepository, ShelfRepository};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    async fn setup_test_db() -> (ShelfRepository, ItemRepository) {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        (
            ShelfRepository::new(db_state.connection()),
            ItemRepository::new(db_state.connection()),
        )
    }

    #[tokio::test]
    async fn test_create_shelf() {
        let (shelves, _) = setup_test_db().await;

        let created = shelves.create(&Shelf::default()).await.expect("Failed to create");
        assert!(!created.id.is_empty());
        assert_eq!(created.name, "New Shelf");
        assert_eq!(created.shelf_type, "custom");
    }

    #[tokio::test]
    async fn test_list_orders_by_order_then_creation() {
        let (shelves, _) = setup_test_db().await;

        let mut late = Shelf::new("Freezer", "custom");
        late.order = 2;
        let late = shelves.create(&late).await.unwrap();
        let first = shelves.create(&Shelf::new("Fridge", "custom")).await.unwrap();
        let second = shelves.create(&Shelf::new("Cupboard", "custom")).await.unwrap();

        let ids: Vec<String> = shelves.list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id, late.id]);
    }

    #[tokio::test]
    async fn test_items_newest_first() {
        let (shelves, items) = setup_test_db().await;
        let shelf = shelves.create(&Shelf::default()).await.unwrap();

        let older = items.create(&Item::new(&shelf.id, "Rice", "Grains", 1, "kg")).await.unwrap();
        let newer = items.create(&Item::new(&shelf.id, "Beans", "Legumes", 2, "can")).await.unwrap();

        let found = shelves.find_by_id(shelf.id.clone()).await.unwrap().unwrap();
        let names: Vec<&str> = found.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Beans", "Rice"]);

        let listed: Vec<String> = items.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(listed, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (shelves, _) = setup_test_db().await;
        shelves.create(&Shelf::new("Fridge", "custom")).await.unwrap();
        shelves.create(&Shelf::new("Spice Rack", "custom")).await.unwrap();

        let found = shelves.search("FRI").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Fridge");

        assert_eq!(shelves.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rename_shelf() {
        let (shelves, _) = setup_test_db().await;
        let shelf = shelves.create(&Shelf::default()).await.unwrap();

        let renamed = shelves.rename(&shelf.id, "Pantry Top").await.unwrap();
        assert_eq!(renamed.name, "Pantry Top");
        assert_eq!(renamed.id, shelf.id);

        let missing = shelves.rename("missing", "x").await.unwrap_err();
        assert_eq!(missing, DomainError::NotFound("Shelf not found".to_string()));
    }

    #[tokio::test]
    async fn test_delete_shelf_cascades() {
        let (shelves, items) = setup_test_db().await;
        let shelf = shelves.create(&Shelf::default()).await.unwrap();
        let other = shelves.create(&Shelf::new("Freezer", "custom")).await.unwrap();
        let item = items.create(&Item::new(&shelf.id, "Milk", "Dairy", 1, "l")).await.unwrap();
        let kept = items.create(&Item::new(&other.id, "Peas", "Frozen", 1, "bag")).await.unwrap();

        let deleted = shelves.delete(shelf.id.clone()).await.expect("Delete failed");
        assert_eq!(deleted.items.len(), 1);

        assert!(shelves.find_by_id(shelf.id.clone()).await.unwrap().is_none());
        assert!(items.find_by_id(item.id).await.unwrap().is_none());

        let remaining: Vec<String> = items.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(remaining, vec![kept.id]);

        let again = shelves.delete(shelf.id).await.unwrap_err();
        assert!(again.is_not_found());
    }

    #[tokio::test]
    async fn test_create_item_on_missing_shelf() {
        let (_, items) = setup_test_db().await;
        let err = items
            .create(&Item::new("missing", "Milk", "Dairy", 1, "l"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_item() {
        let (shelves, items) = setup_test_db().await;
        let shelf = shelves.create(&Shelf::default()).await.unwrap();
        let mut item = items.create(&Item::new(&shelf.id, "Milk", "Dairy", 1, "l")).await.unwrap();

        item.quantity = 3;
        item.expiry_date = NaiveDate::from_ymd_opt(2026, 11, 1);
        item.notes = Some("Oat".to_string());
        let updated = items.update(&item).await.expect("Update failed");

        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.expiry_date, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert_eq!(updated.notes.as_deref(), Some("Oat"));
        assert_eq!(updated.owner_shelf_id, shelf.id);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_item() {
        let (_, items) = setup_test_db().await;
        let mut ghost = Item::new("s1", "Ghost", "None", 1, "pcs");
        ghost.id = "nope".to_string();

        assert!(items.update(&ghost).await.unwrap_err().is_not_found());
        assert!(items.delete("nope".to_string()).await.unwrap_err().is_not_found());
    }
}
