use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, OptionalExtension};

use wardrobe_domain::{validate_item, Color, FilterCriteria, Item, ItemId, ItemPatch};

use crate::query::ItemQuery;
use crate::sql_query::{compile_filter, compile_query};
use crate::store::{ItemStore, StoreError};

const SELECT_COLUMNS: &str = "SELECT id, name, category, brand, size, colors, description,
        image_urls, purchase_date, purchase_price, is_favorite, wear_count, last_worn,
        condition, notes, created, modified
     FROM items";

/// SQLite-backed implementation of the ItemStore trait.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                brand TEXT,
                brand_key TEXT,
                size TEXT,
                colors TEXT NOT NULL DEFAULT '[]',
                description TEXT,
                image_urls TEXT NOT NULL DEFAULT '[]',
                purchase_date INTEGER,
                purchase_price REAL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                wear_count INTEGER NOT NULL DEFAULT 0,
                last_worn INTEGER,
                condition TEXT,
                notes TEXT,
                created INTEGER NOT NULL,
                modified INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS item_tags (
                item_id TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                tag TEXT NOT NULL,
                PRIMARY KEY (item_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_items_created ON items(created);
            CREATE INDEX IF NOT EXISTS idx_items_category ON items(category);
            CREATE INDEX IF NOT EXISTS idx_items_favorite ON items(is_favorite);
            CREATE INDEX IF NOT EXISTS idx_item_tags_tag ON item_tags(tag);
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|e| StoreError::Storage(e.to_string()))
    }

    /// Insert a single item row plus its tags.
    fn insert_item(conn: &Connection, item: &Item) -> Result<(), StoreError> {
        let colors = to_json(&item.colors)?;
        let image_urls = to_json(&item.image_urls)?;

        conn.execute(
            "INSERT INTO items (id, name, category, brand, brand_key, size, colors, description,
                                image_urls, purchase_date, purchase_price, is_favorite, wear_count,
                                last_worn, condition, notes, created, modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                item.id.to_string(),
                item.name,
                item.category.as_str(),
                item.brand,
                brand_key(item),
                item.size.map(|s| s.as_str()),
                colors,
                item.description,
                image_urls,
                item.purchase_date.map(|d| d.timestamp_millis()),
                item.purchase_price,
                item.is_favorite as i32,
                item.wear_count,
                item.last_worn.map(|d| d.timestamp_millis()),
                item.condition,
                item.notes,
                item.created_at.timestamp_millis(),
                item.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return StoreError::AlreadyExists(item.id);
                }
            }
            StoreError::Storage(format!("insert: {}", e))
        })?;

        Self::write_tags(conn, item)
    }

    /// Overwrite every mutable column of an existing row.
    fn write_item(conn: &Connection, item: &Item) -> Result<(), StoreError> {
        let colors = to_json(&item.colors)?;
        let image_urls = to_json(&item.image_urls)?;

        let rows = conn
            .execute(
                "UPDATE items SET name = ?1, category = ?2, brand = ?3, brand_key = ?4, size = ?5,
                        colors = ?6, description = ?7, image_urls = ?8, purchase_date = ?9,
                        purchase_price = ?10, is_favorite = ?11, wear_count = ?12, last_worn = ?13,
                        condition = ?14, notes = ?15, modified = ?16
                 WHERE id = ?17",
                params![
                    item.name,
                    item.category.as_str(),
                    item.brand,
                    brand_key(item),
                    item.size.map(|s| s.as_str()),
                    colors,
                    item.description,
                    image_urls,
                    item.purchase_date.map(|d| d.timestamp_millis()),
                    item.purchase_price,
                    item.is_favorite as i32,
                    item.wear_count,
                    item.last_worn.map(|d| d.timestamp_millis()),
                    item.condition,
                    item.notes,
                    item.updated_at.timestamp_millis(),
                    item.id.to_string(),
                ],
            )
            .map_err(|e| StoreError::Storage(format!("update: {}", e)))?;

        if rows == 0 {
            return Err(StoreError::NotFound(item.id));
        }
        Self::write_tags(conn, item)
    }

    fn write_tags(conn: &Connection, item: &Item) -> Result<(), StoreError> {
        let id_str = item.id.to_string();
        conn.execute("DELETE FROM item_tags WHERE item_id = ?1", params![&id_str])
            .map_err(|e| StoreError::Storage(format!("clear tags: {}", e)))?;
        for (position, tag) in item.tags.iter().enumerate() {
            conn.execute(
                "INSERT INTO item_tags (item_id, position, tag) VALUES (?1, ?2, ?3)",
                params![&id_str, position as i64, tag],
            )
            .map_err(|e| StoreError::Storage(format!("insert tag: {}", e)))?;
        }
        Ok(())
    }

    fn fetch(conn: &Connection, id: ItemId) -> Result<Option<Item>, StoreError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Storage(format!("prepare get: {}", e)))?;

        let item = stmt
            .query_row(params![id.to_string()], |row| Ok(Self::row_to_item(conn, row)))
            .optional()
            .map_err(|e| StoreError::Storage(format!("query get: {}", e)))?;

        item.transpose()
    }

    /// Read an item, patch it in memory, and write it back in one transaction.
    /// Returns the row as stored, so timestamps carry millisecond precision.
    fn modify<F>(&self, id: ItemId, f: F) -> Result<Item, StoreError>
    where
        F: FnOnce(&mut Item) -> Result<(), StoreError>,
    {
        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StoreError::Storage(format!("begin tx: {}", e)))?;

        let mut item = Self::fetch(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        f(&mut item)?;
        Self::write_item(&tx, &item)?;
        let stored = Self::fetch(&tx, id)?.ok_or(StoreError::NotFound(id))?;

        tx.commit()
            .map_err(|e| StoreError::Storage(format!("commit: {}", e)))?;
        Ok(stored)
    }

    /// Read an item from a row result.
    fn row_to_item(conn: &Connection, row: &rusqlite::Row<'_>) -> Result<Item, StoreError> {
        let id_str: String = column(row, 0, "id")?;
        let id: ItemId =
            uuid::Uuid::parse_str(&id_str).map_err(|e| StoreError::Storage(e.to_string()))?;

        let category_str: String = column(row, 2, "category")?;
        let category = category_str
            .parse()
            .map_err(|e| StoreError::Storage(format!("row category: {}", e)))?;
        let size_str: Option<String> = column(row, 4, "size")?;
        let size = size_str
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| StoreError::Storage(format!("row size: {}", e)))?;

        let colors_json: String = column(row, 5, "colors")?;
        let colors: Vec<Color> = serde_json::from_str(&colors_json)
            .map_err(|e| StoreError::Storage(format!("parse colors: {}", e)))?;
        let images_json: String = column(row, 7, "image_urls")?;
        let image_urls: Vec<String> = serde_json::from_str(&images_json)
            .map_err(|e| StoreError::Storage(format!("parse image_urls: {}", e)))?;

        let purchase_ms: Option<i64> = column(row, 8, "purchase_date")?;
        let last_worn_ms: Option<i64> = column(row, 12, "last_worn")?;
        let created_ms: i64 = column(row, 15, "created")?;
        let modified_ms: i64 = column(row, 16, "modified")?;
        let wear_count: i64 = column(row, 11, "wear_count")?;

        let tags = Self::load_tags(conn, &id_str)?;

        Ok(Item {
            id,
            name: column(row, 1, "name")?,
            category,
            brand: column(row, 3, "brand")?,
            size,
            colors,
            description: column(row, 6, "description")?,
            image_urls,
            purchase_date: purchase_ms.map(from_millis).transpose()?,
            purchase_price: column(row, 9, "purchase_price")?,
            tags,
            is_favorite: column(row, 10, "is_favorite")?,
            wear_count: u32::try_from(wear_count)
                .map_err(|e| StoreError::Storage(format!("row wear_count: {}", e)))?,
            last_worn: last_worn_ms.map(from_millis).transpose()?,
            condition: column(row, 13, "condition")?,
            notes: column(row, 14, "notes")?,
            created_at: from_millis(created_ms)?,
            updated_at: from_millis(modified_ms)?,
        })
    }

    fn load_tags(conn: &Connection, item_id: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn
            .prepare("SELECT tag FROM item_tags WHERE item_id = ?1 ORDER BY position")
            .map_err(|e| StoreError::Storage(format!("prepare tags: {}", e)))?;
        let tags = stmt
            .query_map(params![item_id], |row| row.get(0))
            .map_err(|e| StoreError::Storage(format!("query tags: {}", e)))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| StoreError::Storage(format!("collect tags: {}", e)))?;
        Ok(tags)
    }
}

impl ItemStore for SqliteItemStore {
    fn insert(&self, item: Item) -> Result<ItemId, StoreError> {
        validate_item(&item)?;
        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StoreError::Storage(format!("begin tx: {}", e)))?;
        Self::insert_item(&tx, &item)?;
        tx.commit()
            .map_err(|e| StoreError::Storage(format!("commit: {}", e)))?;
        Ok(item.id)
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError> {
        patch.validate()?;
        self.modify(id, |item| {
            patch.apply(item, Utc::now());
            Ok(())
        })
    }

    fn record_wear(&self, id: ItemId) -> Result<Item, StoreError> {
        self.modify(id, |item| {
            item.record_wear(Utc::now());
            Ok(())
        })
    }

    fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, StoreError> {
        self.modify(id, |item| Ok(item.add_images(urls, Utc::now())?))
    }

    fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, StoreError> {
        self.modify(id, |item| match item.remove_images(urls, Utc::now()) {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        })
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        // Foreign key CASCADE handles item_tags
        let rows = conn
            .execute("DELETE FROM items WHERE id = ?1", params![id.to_string()])
            .map_err(|e| StoreError::Storage(format!("delete: {}", e)))?;

        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn list(&self, q: &ItemQuery) -> Result<Vec<Item>, StoreError> {
        let conn = self.lock()?;
        let compiled = compile_query(q);

        let sql = format!(
            "{} {} {} {}",
            SELECT_COLUMNS, compiled.where_clause, compiled.order_clause, compiled.limit_offset
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            compiled.params.iter().map(|p| p as &dyn rusqlite::types::ToSql).collect();

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Storage(format!("prepare list: {} (sql: {})", e, sql)))?;

        let rows = stmt
            .query_map(params_ref.as_slice(), |row| Ok(Self::row_to_item(&conn, row)))
            .map_err(|e| StoreError::Storage(format!("list: {}", e)))?;

        let mut items = Vec::new();
        for row_result in rows {
            let item_result =
                row_result.map_err(|e| StoreError::Storage(format!("row: {}", e)))?;
            items.push(item_result?);
        }
        Ok(items)
    }

    fn count(&self, filters: &FilterCriteria) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let (where_clause, params) = compile_filter(filters);

        let sql = format!("SELECT COUNT(*) FROM items {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|p| p as &dyn rusqlite::types::ToSql).collect();

        let count: i64 = conn
            .query_row(&sql, params_ref.as_slice(), |row| row.get(0))
            .map_err(|e| StoreError::Storage(format!("count: {}", e)))?;

        Ok(count as usize)
    }
}

fn column<T: FromSql>(row: &rusqlite::Row<'_>, idx: usize, name: &str) -> Result<T, StoreError> {
    row.get(idx)
        .map_err(|e| StoreError::Storage(format!("row {}: {}", name, e)))
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StoreError::Storage(format!("invalid timestamp: {}", ms)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Storage(e.to_string()))
}

/// Brand folded with Unicode lowercasing; SQLite's LOWER() only folds ASCII.
fn brand_key(item: &Item) -> Option<String> {
    item.brand.as_deref().map(str::to_lowercase)
}
