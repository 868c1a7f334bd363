//! Import record repository — CRUD for the `import_records` table.
//!
//! Terminal transitions (`complete`, `fail`) are guarded with
//! `WHERE status = 'processing'`: once a record is `done` or `failed` it can
//! never be rewritten, enforcing the one-way lifecycle at the persistence
//! layer.

use std::str::FromStr;

use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::model::{ImportRecord, ImportStatus};

fn from_row(row: &Row<'_>) -> Result<ImportRecord, rusqlite::Error> {
    let status_text: String = row.get("status")?;
    let status = ImportStatus::from_str(&status_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;

    Ok(ImportRecord {
        id: row.get("id")?,
        model_id: row.get("model_id")?,
        filename: row.get("filename")?,
        status,
        ocr_text: row.get("ocr_text")?,
        extracted_json: row.get("extracted_json")?,
        error: row.get("error")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Inserts a new import record.
pub fn insert(db: &Database, record: &ImportRecord) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO import_records (id, model_id, filename, status, ocr_text,
             extracted_json, error, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.model_id,
                record.filename,
                record.status.as_str(),
                record.ocr_text,
                record.extracted_json,
                record.error,
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds an import by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<ImportRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM import_records WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists all imports, newest first.
pub fn list(db: &Database) -> Result<Vec<ImportRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM import_records ORDER BY created_at DESC, id DESC")?;
        let rows: Vec<ImportRecord> = stmt
            .query_map([], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts imports with the given status.
pub fn count_by_status(db: &Database, status: ImportStatus) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM import_records WHERE status = ?1",
            params![status.as_str()],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Marks a processing import as `done`, recording its outputs. Returns false
/// when the record does not exist or is already terminal.
pub fn complete(
    db: &Database,
    id: &str,
    ocr_text: &str,
    extracted_json: &str,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE import_records
             SET status = 'done', ocr_text = ?2, extracted_json = ?3, error = NULL,
                 updated_at = ?4
             WHERE id = ?1 AND status = 'processing'",
            params![id, ocr_text, extracted_json, updated_at],
        )?;
        Ok(changed > 0)
    })
}

/// Marks a processing import as `failed`, recording the error and any text
/// produced before the failure point. Returns false when the record does not
/// exist or is already terminal.
pub fn fail(
    db: &Database,
    id: &str,
    error: &str,
    ocr_text: Option<&str>,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE import_records
             SET status = 'failed', error = ?2, ocr_text = ?3, updated_at = ?4
             WHERE id = ?1 AND status = 'processing'",
            params![id, error, ocr_text, updated_at],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes an import record. Returns whether a row was deleted.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM import_records WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::model_repo;
    use crate::model::ModelDefinition;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn seed_model(db: &Database) -> ModelDefinition {
        let model = ModelDefinition::new("invoices", r#"{"type":"object"}"#);
        model_repo::insert(db, &model).unwrap();
        model
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        let model = seed_model(&db);
        let rec = ImportRecord::new(&model.id, "invoice.pdf");
        insert(&db, &rec).unwrap();

        let found = find_by_id(&db, &rec.id).unwrap().unwrap();
        assert_eq!(found.filename, "invoice.pdf");
        assert_eq!(found.status, ImportStatus::Processing);
        assert!(found.ocr_text.is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let db = test_db();
        let model = seed_model(&db);

        let mut older = ImportRecord::new(&model.id, "older.pdf");
        older.created_at = "2026-01-01T00:00:00Z".to_string();
        let mut newer = ImportRecord::new(&model.id, "newer.pdf");
        newer.created_at = "2026-01-02T00:00:00Z".to_string();
        insert(&db, &older).unwrap();
        insert(&db, &newer).unwrap();

        let records = list(&db).unwrap();
        assert_eq!(records[0].filename, "newer.pdf");
        assert_eq!(records[1].filename, "older.pdf");
    }

    #[test]
    fn test_complete_records_outputs() {
        let db = test_db();
        let model = seed_model(&db);
        let rec = ImportRecord::new(&model.id, "invoice.pdf");
        insert(&db, &rec).unwrap();

        let changed = complete(
            &db,
            &rec.id,
            "Invoice 123",
            r#"{"invoice_number":"123"}"#,
            "2026-01-02T00:00:00Z",
        )
        .unwrap();
        assert!(changed);

        let found = find_by_id(&db, &rec.id).unwrap().unwrap();
        assert_eq!(found.status, ImportStatus::Done);
        assert_eq!(found.ocr_text.as_deref(), Some("Invoice 123"));
        assert_eq!(
            found.extracted_json.as_deref(),
            Some(r#"{"invoice_number":"123"}"#)
        );
        assert!(found.error.is_none());
        assert_eq!(found.updated_at, "2026-01-02T00:00:00Z");
    }

    #[test]
    fn test_fail_records_error_and_partial_text() {
        let db = test_db();
        let model = seed_model(&db);
        let rec = ImportRecord::new(&model.id, "invoice.pdf");
        insert(&db, &rec).unwrap();

        let changed = fail(
            &db,
            &rec.id,
            "LLM output was not valid JSON",
            Some("Invoice 123"),
            "2026-01-02T00:00:00Z",
        )
        .unwrap();
        assert!(changed);

        let found = find_by_id(&db, &rec.id).unwrap().unwrap();
        assert_eq!(found.status, ImportStatus::Failed);
        assert_eq!(found.error.as_deref(), Some("LLM output was not valid JSON"));
        assert_eq!(found.ocr_text.as_deref(), Some("Invoice 123"));
        assert!(found.extracted_json.is_none());
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        let db = test_db();
        let model = seed_model(&db);
        let rec = ImportRecord::new(&model.id, "invoice.pdf");
        insert(&db, &rec).unwrap();

        assert!(complete(&db, &rec.id, "text", "{}", "2026-01-02T00:00:00Z").unwrap());

        // Neither transition may touch a done record.
        assert!(!fail(&db, &rec.id, "late error", None, "2026-01-03T00:00:00Z").unwrap());
        assert!(!complete(&db, &rec.id, "other", "{}", "2026-01-03T00:00:00Z").unwrap());

        let found = find_by_id(&db, &rec.id).unwrap().unwrap();
        assert_eq!(found.status, ImportStatus::Done);
        assert_eq!(found.ocr_text.as_deref(), Some("text"));
        assert!(found.error.is_none());
    }

    #[test]
    fn test_transitions_on_missing_record_return_false() {
        let db = test_db();
        assert!(!complete(&db, "missing", "t", "{}", "2026-01-01T00:00:00Z").unwrap());
        assert!(!fail(&db, "missing", "e", None, "2026-01-01T00:00:00Z").unwrap());
    }

    #[test]
    fn test_count_by_status() {
        let db = test_db();
        let model = seed_model(&db);

        let a = ImportRecord::new(&model.id, "a.pdf");
        let b = ImportRecord::new(&model.id, "b.pdf");
        insert(&db, &a).unwrap();
        insert(&db, &b).unwrap();
        complete(&db, &a.id, "t", "{}", "2026-01-02T00:00:00Z").unwrap();

        assert_eq!(count_by_status(&db, ImportStatus::Processing).unwrap(), 1);
        assert_eq!(count_by_status(&db, ImportStatus::Done).unwrap(), 1);
        assert_eq!(count_by_status(&db, ImportStatus::Failed).unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        let model = seed_model(&db);
        let rec = ImportRecord::new(&model.id, "a.pdf");
        insert(&db, &rec).unwrap();

        assert!(delete(&db, &rec.id).unwrap());
        assert!(!delete(&db, &rec.id).unwrap());
        assert!(find_by_id(&db, &rec.id).unwrap().is_none());
    }
}
