//! Local SQLite copy of the prime parts we track.
use crate::inventory::{InventoryEntry, PrimePart};
use crate::Result;
use common::url_name;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

/// Everything runs one step at a time, and an in-memory database lives on one connection.
const MAX_CONNECTIONS: u32 = 1;
const FIXTURE_MODEL: &str = "inventory.primeitem";

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PrimeItem {
    #[serde(skip)]
    pub id: i64,
    pub name: String,
    pub url_name: String,
    pub ducats: i64,
    pub quantity: i64,
    pub set_name: String,
    pub set_url: String,
    pub item_key: Option<String>,
    /// Sheet marker such as `BUILD`; marked items are kept but never sold.
    pub status: String,
}

impl PrimeItem {
    /// Url names are derived from the display names.
    pub fn new(name: &str, set_name: &str, ducats: i64, quantity: i64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            url_name: url_name(name),
            ducats,
            quantity,
            set_name: set_name.to_string(),
            set_url: url_name(set_name),
            item_key: None,
            status: String::new(),
        }
    }
}

impl From<&PrimePart> for PrimeItem {
    fn from(part: &PrimePart) -> Self {
        Self {
            status: part.status.clone(),
            ..Self::new(
                &part.display_name(),
                &part.set_name(),
                part.ducats.unwrap_or_default(),
                part.quantity.unwrap_or_default(),
            )
        }
    }
}

/// Django-style fixture record, as produced for the old admin dashboard.
#[derive(Debug, Serialize)]
pub struct Fixture<'a> {
    pub model: &'static str,
    pub pk: i64,
    pub fields: &'a PrimeItem,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database at `url` and makes sure the schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        log::info!("Connected to database");
        Ok(db)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prime_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                url_name TEXT NOT NULL UNIQUE,
                ducats INTEGER NOT NULL DEFAULT 0,
                quantity INTEGER NOT NULL DEFAULT 1,
                set_name TEXT NOT NULL,
                set_url TEXT NOT NULL,
                item_key TEXT,
                status TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts the item or refreshes the stored counts. A known item key is never cleared.
    pub async fn upsert_item(&self, item: &PrimeItem) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::upsert(&mut tx, item).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn upsert(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, item: &PrimeItem) -> Result<()> {
        let item_url = if item.url_name.is_empty() {
            url_name(&item.name)
        } else {
            item.url_name.clone()
        };
        let set_url = if item.set_url.is_empty() {
            url_name(&item.set_name)
        } else {
            item.set_url.clone()
        };

        sqlx::query(
            r#"
            INSERT INTO prime_items
                (name, url_name, ducats, quantity, set_name, set_url, item_key, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (url_name) DO UPDATE SET
                name = excluded.name,
                ducats = excluded.ducats,
                quantity = excluded.quantity,
                set_name = excluded.set_name,
                set_url = excluded.set_url,
                item_key = COALESCE(excluded.item_key, prime_items.item_key),
                status = excluded.status
            "#,
        )
        .bind(&item.name)
        .bind(&item_url)
        .bind(item.ducats)
        .bind(item.quantity)
        .bind(&item.set_name)
        .bind(&set_url)
        .bind(&item.item_key)
        .bind(&item.status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Stores every part of a sheet in one transaction.
    pub async fn import_parts<'a>(
        &self,
        parts: impl IntoIterator<Item = &'a PrimePart>,
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut count = 0;
        for part in parts {
            Self::upsert(&mut tx, &PrimeItem::from(part)).await?;
            count += 1;
        }
        tx.commit().await?;
        Ok(count)
    }

    pub async fn list_items(&self) -> Result<Vec<PrimeItem>> {
        Ok(sqlx::query_as::<_, PrimeItem>(
            r#"
            SELECT id, name, url_name, ducats, quantity, set_name, set_url, item_key, status
            FROM prime_items
            ORDER BY set_name, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Stocked items whose sheet row carries no marker.
    pub async fn list_sellable(&self) -> Result<Vec<InventoryEntry>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT url_name, quantity FROM prime_items WHERE quantity > 0 AND status = '' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(item, quantity)| InventoryEntry::new(item, quantity))
            .collect())
    }

    pub async fn item_key(&self, item: &str) -> Result<Option<String>> {
        let key: Option<Option<String>> =
            sqlx::query_scalar("SELECT item_key FROM prime_items WHERE url_name = ?")
                .bind(item)
                .fetch_optional(&self.pool)
                .await?;
        Ok(key.flatten())
    }

    /// Returns false when the item is not tracked locally.
    pub async fn set_item_key(&self, item: &str, key: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE prime_items SET item_key = ? WHERE url_name = ?")
            .bind(key)
            .bind(item)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub fn fixtures(items: &[PrimeItem]) -> Vec<Fixture<'_>> {
    items
        .iter()
        .map(|item| Fixture {
            model: FIXTURE_MODEL,
            pk: item.id,
            fields: item,
        })
        .collect()
}
