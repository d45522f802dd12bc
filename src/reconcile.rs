//! Reconciler
//!
//! Pure merge of the authoritative list with the optimistic store:
//! authoritative rows minus the ones being deleted, in server order,
//! followed by the placeholders the server does not know about yet.

use std::collections::{HashMap, HashSet};

use crate::models::{Entity, Shelf};
use crate::store::{ItemStore, OptimisticStore, ShelfStore};

pub fn reconcile<T: Entity>(authoritative: &[T], store: &OptimisticStore<T>) -> Vec<T> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(authoritative.len());
    let mut merged = Vec::with_capacity(authoritative.len() + store.pending().len());

    for entity in authoritative {
        if !seen.insert(entity.id()) || store.is_deleting(entity.id()) {
            continue;
        }
        merged.push(entity.clone());
    }

    // `seen` holds every authoritative id, including hidden ones
    for placeholder in store.pending() {
        if seen.insert(placeholder.id()) && !store.is_deleting(placeholder.id()) {
            merged.push(placeholder.clone());
        }
    }

    merged
}

/// Shelves as rendered, with each shelf's items merged against its own store
pub fn reconcile_shelves(
    authoritative: &[Shelf],
    shelves: &ShelfStore,
    items: &HashMap<String, ItemStore>,
) -> Vec<Shelf> {
    reconcile(authoritative, shelves)
        .into_iter()
        .map(|mut shelf| {
            if let Some(store) = items.get(&shelf.id) {
                shelf.items = reconcile(&shelf.items, store);
            }
            shelf
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemDraft};
    use chrono::Utc;

    fn shelf(id: &str) -> Shelf {
        let mut s = Shelf::placeholder(id.to_string());
        s.is_optimistic = false;
        s.name = format!("Shelf {id}");
        s
    }

    fn item(id: &str, shelf_id: &str) -> Item {
        let now = Utc::now();
        Item {
            id: id.to_string(),
            name: format!("Item {id}"),
            category: "Dairy".to_string(),
            quantity: 1,
            unit: "pcs".to_string(),
            expiry_date: None,
            notes: None,
            owner_shelf_id: shelf_id.to_string(),
            created_at: now,
            updated_at: now,
            is_optimistic: false,
        }
    }

    fn ids<T: Entity>(list: &[T]) -> Vec<&str> {
        list.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_placeholders_follow_server_order() {
        let server = vec![shelf("s2"), shelf("s1")];
        let mut store = ShelfStore::new();
        let temp = store.begin_create_shelf(1);

        let merged = reconcile(&server, &store);
        assert_eq!(ids(&merged), vec!["s2", "s1", temp.as_str()]);
    }

    #[test]
    fn test_deleting_ids_are_hidden() {
        let server = vec![shelf("s1"), shelf("s2")];
        let mut store = ShelfStore::new();
        store.begin_delete("s1");

        assert_eq!(ids(&reconcile(&server, &store)), vec!["s2"]);

        store.end_delete("s1");
        assert_eq!(ids(&reconcile(&server, &store)), vec!["s1", "s2"]);
    }

    #[test]
    fn test_confirmed_placeholder_never_duplicates() {
        let mut store = ShelfStore::new();
        let temp = store.begin_create_shelf(1);
        // Server already lists a row under the placeholder's id
        let server = vec![shelf(&temp)];

        for _ in 0..3 {
            let merged = reconcile(&server, &store);
            assert_eq!(ids(&merged), vec![temp.as_str()]);
            assert!(!merged[0].is_optimistic);
        }
    }

    #[test]
    fn test_duplicate_server_ids_collapse() {
        let server = vec![shelf("s1"), shelf("s1")];
        assert_eq!(ids(&reconcile(&server, &ShelfStore::new())), vec!["s1"]);
    }

    #[test]
    fn test_is_pure() {
        let server = vec![shelf("s1")];
        let mut store = ShelfStore::new();
        store.begin_create_shelf(7);
        assert_eq!(reconcile(&server, &store), reconcile(&server, &store));
    }

    #[test]
    fn test_items_merge_per_shelf() {
        let mut s1 = shelf("s1");
        s1.items = vec![item("i2", "s1"), item("i1", "s1")];
        let s2 = shelf("s2");

        let mut s1_items = ItemStore::new();
        s1_items.begin_delete_item("i1");
        let draft = ItemDraft {
            name: "Butter".to_string(),
            category: "Dairy".to_string(),
            quantity: 1,
            unit: "pcs".to_string(),
            owner_shelf_id: "s1".to_string(),
            expiry_date: None,
            notes: None,
        };
        let temp = s1_items.begin_create_item(1, &draft);

        let mut items = HashMap::new();
        items.insert("s1".to_string(), s1_items);

        let merged = reconcile_shelves(&[s1, s2], &ShelfStore::new(), &items);
        assert_eq!(ids(&merged[0].items), vec!["i2", temp.as_str()]);
        assert!(merged[1].items.is_empty());
    }
}
