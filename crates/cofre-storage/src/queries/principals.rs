// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Principal CRUD operations.

use cofre_core::CofreError;
use rusqlite::params;

use crate::database::Database;
use crate::models::PrincipalRow;

fn row_to_principal(row: &rusqlite::Row<'_>) -> Result<PrincipalRow, rusqlite::Error> {
    Ok(PrincipalRow {
        id: row.get(0)?,
        username: row.get(1)?,
        verification_hash: row.get(2)?,
        salt: row.get(3)?,
        recovery_hash: row.get(4)?,
        parent_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const PRINCIPAL_COLUMNS: &str =
    "id, username, verification_hash, salt, recovery_hash, parent_id, created_at";

/// Create a new principal. Returns the assigned id.
///
/// Fails with the storage error for a duplicate username (UNIQUE
/// constraint); the service layer translates that into `InvalidInput`.
pub async fn create_principal(
    db: &Database,
    username: &str,
    verification_hash: &str,
    salt_b64: &str,
    recovery_hash: Option<&str>,
    parent_id: Option<i64>,
) -> Result<i64, CofreError> {
    let username = username.to_string();
    let verification_hash = verification_hash.to_string();
    let salt_b64 = salt_b64.to_string();
    let recovery_hash = recovery_hash.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO principals (username, verification_hash, salt, recovery_hash, parent_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![username, verification_hash, salt_b64, recovery_hash, parent_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a principal by id.
pub async fn get_principal(db: &Database, id: i64) -> Result<Option<PrincipalRow>, CofreError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = ?1"),
                params![id],
                row_to_principal,
            );
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a principal by username.
pub async fn get_principal_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<PrincipalRow>, CofreError> {
    let username = username.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE username = ?1"),
                params![username],
                row_to_principal,
            );
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
