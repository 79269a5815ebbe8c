//! SQLite-backed measurement history.
//!
//! One table, one connection, synchronous access. The store owns the
//! connection handle it was constructed with; callers never touch SQL.
//! Derived fields (bmi, status) are computed once at append time and stored
//! denormalized.

use crate::{metrics, BmiStatus, Error, HistorySummary, NewMeasurement, Record, Result};
use chrono::Local;
use rusqlite::{params, Connection};
use std::path::Path;

/// Timestamp format stored in the history table (minute precision)
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Append-only history of BMI measurements
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Open (creating if needed) the history database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = HistoryStore { conn };
        store.migrate()?;
        tracing::debug!("Opened history store at {:?}", path);
        Ok(store)
    }

    /// Open an in-memory store (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = HistoryStore { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS bmi_history (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    date TEXT NOT NULL,
                    height REAL NOT NULL,
                    weight REAL NOT NULL,
                    bmi REAL NOT NULL,
                    status TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_bmi_history_name ON bmi_history(name);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // Expects columns: id, name, date, height, weight, bmi, status
    fn record_from_row(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        let status_label: String = row.get(6)?;
        let status = BmiStatus::from_label(&status_label).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown status label: {status_label}").into(),
            )
        })?;

        Ok(Record {
            id: row.get(0)?,
            name: row.get(1)?,
            recorded_at: row.get(2)?,
            height_cm: row.get(3)?,
            weight_kg: row.get(4)?,
            bmi: row.get(5)?,
            status,
        })
    }

    /// Validate, derive and insert a measurement; returns the stored record
    ///
    /// The bmi is rounded to 2 decimals before classification so the two
    /// stored fields can never disagree at a band edge.
    pub fn append(&self, measurement: &NewMeasurement) -> Result<Record> {
        if measurement.name.trim().is_empty() {
            return Err(Error::InvalidInput("name must not be empty".into()));
        }

        let bmi = metrics::round_bmi(metrics::compute_bmi(
            measurement.height_cm,
            measurement.weight_kg,
        )?);
        let status = metrics::classify(bmi);
        let recorded_at = Local::now().format(DATE_FORMAT).to_string();

        self.conn.execute(
            "INSERT INTO bmi_history (name, date, height, weight, bmi, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                measurement.name,
                recorded_at,
                measurement.height_cm,
                measurement.weight_kg,
                bmi,
                status.label(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Appended record {} for {}", id, measurement.name);
        self.get(id)
    }

    fn get(&self, id: i64) -> Result<Record> {
        Ok(self.conn.query_row(
            "SELECT id, name, date, height, weight, bmi, status
             FROM bmi_history WHERE id = ?1",
            params![id],
            Self::record_from_row,
        )?)
    }

    /// All records, timestamp ascending
    ///
    /// Timestamps are minute precision, so id breaks ties in insertion order.
    pub fn query_all(&self) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, date, height, weight, bmi, status
             FROM bmi_history ORDER BY date ASC, id ASC",
        )?;
        let records = stmt
            .query_map([], Self::record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Records for one subject, timestamp ascending
    pub fn query_by_name(&self, name: &str) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, date, height, weight, bmi, status
             FROM bmi_history WHERE name = ?1 ORDER BY date ASC, id ASC",
        )?;
        let records = stmt
            .query_map(params![name], Self::record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Distinct subject names, sorted (the user selector)
    pub fn names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT name FROM bmi_history ORDER BY name ASC")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Delete records by id; unknown ids are a silent no-op
    ///
    /// Returns the number of rows actually removed. The whole batch is one
    /// DELETE statement.
    pub fn delete_by_ids(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!("DELETE FROM bmi_history WHERE id IN ({placeholders})");
        let deleted = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(ids.iter()))?;

        tracing::debug!("Deleted {} of {} requested records", deleted, ids.len());
        Ok(deleted)
    }

    /// History rollup for one subject: latest/previous records and BMI extremes
    ///
    /// Returns None when the subject has no records.
    pub fn summary_for(&self, name: &str) -> Result<Option<HistorySummary>> {
        let records = self.query_by_name(name)?;
        let Some(latest) = records.last().cloned() else {
            return Ok(None);
        };

        let previous = (records.len() > 1).then(|| records[records.len() - 2].clone());
        let max_bmi = records.iter().map(|r| r.bmi).fold(f64::NEG_INFINITY, f64::max);
        let min_bmi = records.iter().map(|r| r.bmi).fold(f64::INFINITY, f64::min);

        Ok(Some(HistorySummary {
            latest,
            previous,
            max_bmi,
            min_bmi,
            count: records.len(),
        }))
    }
}
