// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted entry operations.
//!
//! Entries hold only ciphertext; nothing in this module touches keys or
//! plaintext. The bulk rewrite used by passphrase change lives in the
//! re-key protocol so it can share a transaction with the credential
//! swap.

use cofre_core::CofreError;
use rusqlite::params;

use crate::database::Database;
use crate::models::EntryRow;

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<EntryRow, rusqlite::Error> {
    Ok(EntryRow {
        id: row.get(0)?,
        domain_kind: row.get(1)?,
        domain_id: row.get(2)?,
        label: row.get(3)?,
        ciphertext: row.get(4)?,
        nonce: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const ENTRY_COLUMNS: &str =
    "id, domain_kind, domain_id, label, ciphertext, nonce, created_at, updated_at";

/// Insert an encrypted entry. Returns the assigned id.
pub async fn insert_entry(
    db: &Database,
    domain_kind: &str,
    domain_id: i64,
    label: &str,
    ciphertext_b64: &str,
    nonce_b64: &str,
) -> Result<i64, CofreError> {
    let domain_kind = domain_kind.to_string();
    let label = label.to_string();
    let ciphertext_b64 = ciphertext_b64.to_string();
    let nonce_b64 = nonce_b64.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO entries (domain_kind, domain_id, label, ciphertext, nonce)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![domain_kind, domain_id, label, ciphertext_b64, nonce_b64],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an entry by id.
pub async fn get_entry(db: &Database, id: i64) -> Result<Option<EntryRow>, CofreError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"),
                params![id],
                row_to_entry,
            );
            match result {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all entries in a domain, oldest first.
pub async fn list_entries_for_domain(
    db: &Database,
    domain_kind: &str,
    domain_id: i64,
) -> Result<Vec<EntryRow>, CofreError> {
    let domain_kind = domain_kind.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<EntryRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE domain_kind = ?1 AND domain_id = ?2 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![domain_kind, domain_id], row_to_entry)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete an entry by id. Returns whether a row existed.
pub async fn delete_entry(db: &Database, id: i64) -> Result<bool, CofreError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let affected = conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn insert_and_get_entry_roundtrips() {
        let (db, _dir) = setup_db().await;

        let id = insert_entry(&db, "personal", 1, "email", "Y2lwaGVy", "bm9uY2U")
            .await
            .unwrap();

        let entry = get_entry(&db, id).await.unwrap().unwrap();
        assert_eq!(entry.domain_kind, "personal");
        assert_eq!(entry.domain_id, 1);
        assert_eq!(entry.label, "email");
        assert_eq!(entry.ciphertext, "Y2lwaGVy");
        assert_eq!(entry.nonce, "bm9uY2U");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_domain_kind_is_rejected() {
        let (db, _dir) = setup_db().await;
        let result = insert_entry(&db, "cosmic", 1, "l", "c", "n").await;
        assert!(result.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_domain() {
        let (db, _dir) = setup_db().await;
        insert_entry(&db, "personal", 1, "a", "c", "n").await.unwrap();
        insert_entry(&db, "personal", 1, "b", "c", "n").await.unwrap();
        insert_entry(&db, "personal", 2, "other", "c", "n")
            .await
            .unwrap();
        insert_entry(&db, "group", 1, "grp", "c", "n").await.unwrap();

        let entries = list_entries_for_domain(&db, "personal", 1).await.unwrap();
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_entry_reports_existence() {
        let (db, _dir) = setup_db().await;
        let id = insert_entry(&db, "child", 7, "a", "c", "n").await.unwrap();

        assert!(delete_entry(&db, id).await.unwrap());
        assert!(!delete_entry(&db, id).await.unwrap());
        assert!(get_entry(&db, id).await.unwrap().is_none());

        db.close().await.unwrap();
    }
}
