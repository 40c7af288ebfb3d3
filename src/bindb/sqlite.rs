//! SQLite-backed BIN lookup (`bin-sqlite` feature).
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE bins (
//!     bin TEXT PRIMARY KEY,
//!     issuer TEXT,
//!     card_type TEXT,
//!     card_level TEXT,
//!     country TEXT,
//!     country_name TEXT,
//!     brand TEXT,
//!     bank_phone TEXT,
//!     bank_url TEXT
//! );
//! ```
//!
//! Query failures surface as [`LookupError::Transport`], so a
//! [`FallbackLookup`](super::FallbackLookup) around this type degrades to
//! the static table when the database is unavailable.

use super::{
    bin_digits, BinDbError, BinInfo, BinLookup, CardLevel, CardType, LookupError, MemoryBinDb,
    MIN_BIN_DIGITS,
};
use crate::card::digits_to_string;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const COLUMNS: &str =
    "bin, issuer, card_type, card_level, country, country_name, brand, bank_phone, bank_url";

/// BIN lookup that queries SQLite on every call.
pub struct SqliteBinDb {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteBinDb {
    /// Opens a database file read-only, using the `bins` table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BinDbError> {
        Self::open_with_table(path, "bins")
    }

    /// Opens a database file read-only, using `table`.
    pub fn open_with_table<P: AsRef<Path>>(path: P, table: &str) -> Result<Self, BinDbError> {
        let table = checked_table_name(table)?;
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| BinDbError::IoError(std::io::Error::other(e.to_string())))?;
        Ok(Self {
            conn: Mutex::new(conn),
            table,
        })
    }

    /// Opens an empty in-memory database with the `bins` table created.
    pub fn open_in_memory() -> Result<Self, BinDbError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| BinDbError::IoError(std::io::Error::other(e.to_string())))?;
        let db = Self {
            conn: Mutex::new(conn),
            table: "bins".to_string(),
        };
        db.create_schema()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, BinDbError> {
        self.conn
            .lock()
            .map_err(|_| BinDbError::InvalidDatabase("connection lock poisoned".to_string()))
    }

    /// Creates the table if it does not exist.
    pub fn create_schema(&self) -> Result<(), BinDbError> {
        self.conn()?
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {t} (
                    bin TEXT PRIMARY KEY,
                    issuer TEXT,
                    card_type TEXT,
                    card_level TEXT,
                    country TEXT,
                    country_name TEXT,
                    brand TEXT,
                    bank_phone TEXT,
                    bank_url TEXT
                );",
                t = self.table
            ))
            .map_err(db_error)
    }

    /// Inserts or replaces entries in one transaction.
    pub fn insert_many(&self, entries: &[BinInfo]) -> Result<(), BinDbError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(db_error)?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT OR REPLACE INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    self.table, COLUMNS
                ))
                .map_err(db_error)?;
            for info in entries {
                stmt.execute(rusqlite::params![
                    info.bin,
                    info.issuer,
                    info.card_type.map(|t| t.to_string()),
                    info.card_level.map(|l| l.to_string()),
                    info.country,
                    info.country_name,
                    info.brand,
                    info.bank_phone,
                    info.bank_url,
                ])
                .map_err(db_error)?;
            }
        }
        tx.commit().map_err(db_error)
    }

    /// Number of rows in the table.
    pub fn count(&self) -> Result<usize, BinDbError> {
        let n: i64 = self
            .conn()?
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                row.get(0)
            })
            .map_err(db_error)?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Copies every row into a [`MemoryBinDb`].
    pub fn load_all(&self) -> Result<MemoryBinDb, BinDbError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM {}", COLUMNS, self.table))
            .map_err(db_error)?;
        let rows = stmt.query_map([], row_to_info).map_err(db_error)?;

        let mut db = MemoryBinDb::new();
        for row in rows {
            let info = row.map_err(db_error)?;
            let bin = info.bin.clone();
            db.insert(&bin, info);
        }
        Ok(db)
    }

    fn find(&self, bin: &str) -> Result<Option<BinInfo>, BinDbError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare_cached(&format!("SELECT {} FROM {} WHERE bin = ?1", COLUMNS, self.table))
            .map_err(db_error)?;
        stmt.query_row([bin], row_to_info)
            .optional()
            .map_err(db_error)
    }
}

impl BinLookup for SqliteBinDb {
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError> {
        let digits = digits_to_string(&bin_digits(bin)?);
        for len in (MIN_BIN_DIGITS..=digits.len()).rev() {
            let found = self
                .find(&digits[..len])
                .map_err(|e| LookupError::Transport(e.to_string()))?;
            if let Some(info) = found {
                return Ok(info);
            }
        }
        Err(LookupError::NotFound(digits))
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

fn row_to_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<BinInfo> {
    Ok(BinInfo {
        bin: row.get(0)?,
        issuer: row.get(1)?,
        card_type: row.get::<_, Option<String>>(2)?.as_deref().map(CardType::from_label),
        card_level: row.get::<_, Option<String>>(3)?.as_deref().map(CardLevel::from_label),
        country: row.get(4)?,
        country_name: row.get(5)?,
        brand: row.get(6)?,
        bank_phone: row.get(7)?,
        bank_url: row.get(8)?,
    })
}

fn db_error(e: rusqlite::Error) -> BinDbError {
    BinDbError::InvalidDatabase(e.to_string())
}

fn checked_table_name(table: &str) -> Result<String, BinDbError> {
    let ok = !table.is_empty()
        && table.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        && !table.as_bytes()[0].is_ascii_digit();
    if ok {
        Ok(table.to_string())
    } else {
        Err(BinDbError::InvalidDatabase(format!("invalid table name '{}'", table)))
    }
}
