//! Model definition repository — CRUD for the `model_definitions` table.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::model::ModelDefinition;

fn from_row(row: &Row<'_>) -> Result<ModelDefinition, rusqlite::Error> {
    Ok(ModelDefinition {
        id: row.get("id")?,
        name: row.get("name")?,
        json_schema: row.get("json_schema")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Inserts a new model definition.
pub fn insert(db: &Database, model: &ModelDefinition) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO model_definitions (id, name, json_schema, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                model.id,
                model.name,
                model.json_schema,
                model.created_at,
                model.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds a model by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<ModelDefinition>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM model_definitions WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists all model definitions, newest first.
pub fn list(db: &Database) -> Result<Vec<ModelDefinition>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM model_definitions ORDER BY created_at DESC, id DESC")?;
        let rows: Vec<ModelDefinition> = stmt
            .query_map([], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Replaces a model's name and schema, bumping `updated_at`. Returns whether
/// a row was updated.
pub fn update(
    db: &Database,
    id: &str,
    name: &str,
    json_schema: &str,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE model_definitions SET name = ?2, json_schema = ?3, updated_at = ?4
             WHERE id = ?1",
            params![id, name, json_schema, updated_at],
        )?;
        Ok(changed > 0)
    })
}

/// Counts imports referencing a model.
pub fn count_imports(db: &Database, id: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM import_records WHERE model_id = ?1",
            params![id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Deletes a model. Refused while any import references it. Returns whether
/// a row was deleted.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    let imports = count_imports(db, id)?;
    if imports > 0 {
        return Err(DatabaseError::ModelInUse {
            id: id.to_string(),
            imports,
        });
    }

    db.with_conn(|conn| {
        let changed = conn.execute(
            "DELETE FROM model_definitions WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    })
}
