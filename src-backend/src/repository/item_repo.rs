//! Item Repository Implementation
//!
//! SQLite-backed implementation of Repository<Item>

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::db::{from_millis, internal, new_id, now_millis, open_conn, SharedConnection};
use super::traits::Repository;
use crate::domain::{DomainError, DomainResult, Entity, Item};

const ITEM_COLUMNS: &str =
    "id, name, category, quantity, unit, expiry_date, notes, shelf_id, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite implementation of Item repository
pub struct ItemRepository {
    conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let shelf_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM shelves WHERE id = ?1)",
                params![entity.owner_shelf_id],
                |row| row.get(0),
            )
            .map_err(internal)?;
        if !shelf_exists {
            return Err(DomainError::NotFound("Shelf not found".to_string()));
        }

        let now = now_millis();
        let mut item = entity.clone();
        item.id = new_id();
        item.created_at = from_millis(now);
        item.updated_at = item.created_at;

        conn.execute(
            &format!("INSERT INTO items ({ITEM_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
            params![
                item.id,
                item.name,
                item.category,
                item.quantity,
                item.unit,
                item.expiry_date.map(|d| d.format(DATE_FORMAT).to_string()),
                item.notes,
                item.owner_shelf_id,
                now,
                now
            ],
        )
        .map_err(internal)?;

        Ok(item)
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Item>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        find_item(conn, &id)
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        query_items(conn, "", [])
    }

    async fn update(&self, entity: &Item) -> DomainResult<Item> {
        if entity.is_new() {
            return Err(DomainError::NotFound("Item not found".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let changed = conn
            .execute(
                "UPDATE items SET name = ?1, category = ?2, quantity = ?3, unit = ?4, expiry_date = ?5, notes = ?6, updated_at = ?7 WHERE id = ?8",
                params![
                    entity.name,
                    entity.category,
                    entity.quantity,
                    entity.unit,
                    entity.expiry_date.map(|d| d.format(DATE_FORMAT).to_string()),
                    entity.notes,
                    now_millis(),
                    entity.id
                ],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(DomainError::NotFound("Item not found".to_string()));
        }

        find_item(conn, &entity.id)?.ok_or_else(|| DomainError::NotFound("Item not found".to_string()))
    }

    async fn delete(&self, id: String) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let item = find_item(conn, &id)?
            .ok_or_else(|| DomainError::NotFound("Item not found".to_string()))?;
        conn.execute("DELETE FROM items WHERE id = ?1", params![id])
            .map_err(internal)?;
        Ok(item)
    }
}

pub(crate) fn find_item(conn: &Connection, id: &str) -> DomainResult<Option<Item>> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
        params![id],
        row_to_item,
    )
    .optional()
    .map_err(internal)
}

/// Items matching `filter`, newest first
pub(crate) fn query_items<P: rusqlite::Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> DomainResult<Vec<Item>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items {filter} ORDER BY created_at DESC, rowid DESC"
        ))
        .map_err(internal)?;
    let rows = stmt.query_map(params, row_to_item).map_err(internal)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(internal)
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    let expiry: Option<String> = row.get(5)?;
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        quantity: row.get(3)?,
        unit: row.get(4)?,
        expiry_date: expiry.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
        notes: row.get(6)?,
        owner_shelf_id: row.get(7)?,
        created_at: from_millis(row.get(8)?),
        updated_at: from_millis(row.get(9)?),
    })
}
