//! SQLite-backed golden-standard record store.

use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use checkmed_core::{FormFactor, GoldenRecord, GoldenRegistry, Lookup};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Input for one registration.
#[derive(Debug, Clone)]
pub struct NewMedicine {
    pub drug_name: String,
    pub form_factor: FormFactor,
    pub registration_number: String,
    pub manufacturer: String,
    pub package_image_ref: String,
    pub secondary_image_ref: Option<String>,
}

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> RegistryResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// SQLite in-memory DB, for tests.
    pub fn memory() -> RegistryResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> RegistryResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::schema::DDL)?;
        Ok(())
    }

    /// Insert a new golden record.
    ///
    /// Identity fields get the same trim/lowercase treatment the evidence
    /// normalizer applies, so lookups by normalized evidence always match.
    /// At most one record per (name, form factor) pair; a second insert for
    /// the same pair is rejected.
    pub fn register(&self, new: NewMedicine) -> RegistryResult<GoldenRecord> {
        let drug_name = new.drug_name.trim().to_lowercase();
        if drug_name.is_empty() {
            return Err(RegistryError::InvalidRecord {
                message: "drug name must not be empty".to_string(),
            });
        }
        let registration_number = new.registration_number.trim().to_string();
        if registration_number.is_empty() {
            return Err(RegistryError::InvalidRecord {
                message: "registration number must not be empty".to_string(),
            });
        }
        if new.form_factor == FormFactor::Tablet && new.secondary_image_ref.is_none() {
            return Err(RegistryError::InvalidRecord {
                message: "tablet records require a blister image".to_string(),
            });
        }

        let created_at = Utc::now();
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO medicines
               (drug_name, form_factor, registration_number, manufacturer,
                package_image_ref, secondary_image_ref, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                drug_name,
                new.form_factor.as_str(),
                registration_number,
                new.manufacturer.trim(),
                new.package_image_ref,
                new.secondary_image_ref,
                created_at.to_rfc3339(),
            ],
        )?;
        if inserted == 0 {
            return Err(RegistryError::Duplicate {
                name: drug_name,
                form: new.form_factor.as_str().to_string(),
            });
        }

        tracing::info!(drug = %drug_name, form = %new.form_factor, "registered golden record");
        Ok(GoldenRecord {
            drug_name,
            form_factor: new.form_factor,
            registration_number,
            manufacturer: new.manufacturer.trim().to_string(),
            package_image_ref: new.package_image_ref,
            secondary_image_ref: new.secondary_image_ref,
            created_at,
        })
    }

    /// Resolve a (name, form factor) pair. On a miss, reports the form
    /// factors that do exist for the name, in registration order.
    pub fn lookup(&self, name: &str, form: FormFactor) -> RegistryResult<Lookup> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT drug_name, form_factor, registration_number, manufacturer,
                    package_image_ref, secondary_image_ref, created_at
             FROM medicines
             WHERE drug_name = ?1 AND form_factor = ?2",
        )?;
        let mut rows = stmt.query_map(params![name, form.as_str()], row_to_record)?;
        if let Some(record) = rows.next() {
            return Ok(Lookup::Hit(record?));
        }

        let mut stmt = conn.prepare(
            "SELECT form_factor FROM medicines WHERE drug_name = ?1 ORDER BY id",
        )?;
        let mut available = Vec::new();
        for raw in stmt.query_map(params![name], |row| row.get::<_, String>(0))? {
            let raw = raw?;
            // Unknown stored values would mean a foreign writer; surface them.
            let form = FormFactor::parse(&raw).ok_or_else(|| RegistryError::Storage {
                message: format!("unknown form factor '{raw}' stored for '{name}'"),
            })?;
            available.push(form);
        }
        Ok(Lookup::Miss { available })
    }

    /// All records, oldest first.
    pub fn list(&self) -> RegistryResult<Vec<GoldenRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT drug_name, form_factor, registration_number, manufacturer,
                    package_image_ref, secondary_image_ref, created_at
             FROM medicines ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_record)?;
        let mut records = Vec::new();
        for r in rows {
            records.push(r?);
        }
        Ok(records)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<GoldenRecord> {
    let form_raw: String = row.get(1)?;
    let form_factor = FormFactor::parse(&form_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown form factor '{form_raw}'").into(),
        )
    })?;
    let created_raw: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(GoldenRecord {
        drug_name: row.get(0)?,
        form_factor,
        registration_number: row.get(2)?,
        manufacturer: row.get(3)?,
        package_image_ref: row.get(4)?,
        secondary_image_ref: row.get(5)?,
        created_at,
    })
}

#[async_trait]
impl GoldenRegistry for Store {
    async fn lookup(&self, name: &str, form: FormFactor) -> anyhow::Result<Lookup> {
        Ok(Store::lookup(self, name, form)?)
    }
}
