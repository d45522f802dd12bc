//! Shelf Repository Implementation
//!
//! SQLite-backed implementation of Repository<Shelf> and
//! SearchableRepository<Shelf>. Shelves always come back with their items.

use std::collections::HashMap;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::db::{from_millis, internal, new_id, now_millis, open_conn, SharedConnection};
use super::item_repo::query_items;
use super::traits::{Repository, SearchableRepository};
use crate::domain::{DomainError, DomainResult, Entity, Item, Shelf};

const SHELF_COLUMNS: &str = "id, name, shelf_type, sort_order, created_at, updated_at";

/// SQLite implementation of Shelf repository
pub struct ShelfRepository {
    conn: SharedConnection,
}

impl ShelfRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Change only the name of a shelf
    pub async fn rename(&self, id: &str, name: &str) -> DomainResult<Shelf> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let changed = conn
            .execute(
                "UPDATE shelves SET name = ?1, updated_at = ?2 WHERE id = ?3",
                params![name, now_millis(), id],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(shelf_not_found());
        }
        find_shelf(conn, id)?.ok_or_else(shelf_not_found)
    }
}

#[async_trait]
impl Repository<Shelf> for ShelfRepository {
    async fn create(&self, entity: &Shelf) -> DomainResult<Shelf> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let now = now_millis();
        let mut shelf = entity.clone();
        shelf.id = new_id();
        shelf.items = Vec::new();
        shelf.created_at = from_millis(now);
        shelf.updated_at = shelf.created_at;

        conn.execute(
            &format!("INSERT INTO shelves ({SHELF_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![shelf.id, shelf.name, shelf.shelf_type, shelf.order, now, now],
        )
        .map_err(internal)?;

        Ok(shelf)
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Shelf>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        find_shelf(conn, &id)
    }

    async fn list(&self) -> DomainResult<Vec<Shelf>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        all_shelves(conn)
    }

    async fn update(&self, entity: &Shelf) -> DomainResult<Shelf> {
        if entity.is_new() {
            return Err(shelf_not_found());
        }
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let changed = conn
            .execute(
                "UPDATE shelves SET name = ?1, shelf_type = ?2, sort_order = ?3, updated_at = ?4 WHERE id = ?5",
                params![entity.name, entity.shelf_type, entity.order, now_millis(), entity.id],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(shelf_not_found());
        }
        find_shelf(conn, &entity.id)?.ok_or_else(shelf_not_found)
    }

    async fn delete(&self, id: String) -> DomainResult<Shelf> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        // Items go with the shelf through ON DELETE CASCADE
        let tx = conn.unchecked_transaction().map_err(internal)?;
        let shelf = find_shelf(&tx, &id)?.ok_or_else(shelf_not_found)?;
        tx.execute("DELETE FROM shelves WHERE id = ?1", params![id])
            .map_err(internal)?;
        tx.commit().map_err(internal)?;

        Ok(shelf)
    }
}

#[async_trait]
impl SearchableRepository<Shelf> for ShelfRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Shelf>> {
        let shelves = self.list().await?;
        Ok(shelves.into_iter().filter(|s| s.name_matches(query)).collect())
    }
}

fn shelf_not_found() -> DomainError {
    DomainError::NotFound("Shelf not found".to_string())
}

fn find_shelf(conn: &Connection, id: &str) -> DomainResult<Option<Shelf>> {
    let shelf = conn
        .query_row(
            &format!("SELECT {SHELF_COLUMNS} FROM shelves WHERE id = ?1"),
            params![id],
            row_to_shelf,
        )
        .optional()
        .map_err(internal)?;

    match shelf {
        Some(mut shelf) => {
            shelf.items = query_items(conn, "WHERE shelf_id = ?1", params![id])?;
            Ok(Some(shelf))
        }
        None => Ok(None),
    }
}

/// Every shelf by `order`, each with its items newest first
fn all_shelves(conn: &Connection) -> DomainResult<Vec<Shelf>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SHELF_COLUMNS} FROM shelves ORDER BY sort_order ASC, created_at ASC, rowid ASC"
        ))
        .map_err(internal)?;
    let mut shelves = stmt
        .query_map([], row_to_shelf)
        .map_err(internal)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(internal)?;

    let mut by_shelf: HashMap<String, Vec<Item>> = HashMap::new();
    for item in query_items(conn, "", [])? {
        by_shelf.entry(item.owner_shelf_id.clone()).or_default().push(item);
    }
    for shelf in &mut shelves {
        shelf.items = by_shelf.remove(&shelf.id).unwrap_or_default();
    }
    Ok(shelves)
}

fn row_to_shelf(row: &Row<'_>) -> rusqlite::Result<Shelf> {
    Ok(Shelf {
        id: row.get(0)?,
        name: row.get(1)?,
        shelf_type: row.get(2)?,
        order: row.get(3)?,
        items: Vec::new(),
        created_at: from_millis(row.get(4)?),
        updated_at: from_millis(row.get(5)?),
    })
}
