// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group domain and membership operations.

use cofre_core::CofreError;
use rusqlite::params;

use crate::database::Database;
use crate::models::GroupDomainRow;

/// Create a group domain with the given owner and key.
///
/// The owner is enrolled as the first member in the same transaction.
pub async fn create_group(db: &Database, owner_id: i64, key_b64: &str) -> Result<i64, CofreError> {
    let key_b64 = key_b64.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO group_domains (owner_id, key_b64) VALUES (?1, ?2)",
                params![owner_id, key_b64],
            )?;
            let group_id = tx.last_insert_rowid();
            tx.execute(
                "INSERT INTO group_members (group_id, principal_id) VALUES (?1, ?2)",
                params![group_id, owner_id],
            )?;
            tx.commit()?;
            Ok(group_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a group domain by id.
pub async fn get_group(db: &Database, group_id: i64) -> Result<Option<GroupDomainRow>, CofreError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, owner_id, key_b64, created_at FROM group_domains WHERE id = ?1",
                params![group_id],
                |row| {
                    Ok(GroupDomainRow {
                        id: row.get(0)?,
                        owner_id: row.get(1)?,
                        key_b64: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            );
            match result {
                Ok(group) => Ok(Some(group)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether a principal is currently a member of the group.
pub async fn is_member(db: &Database, group_id: i64, principal_id: i64) -> Result<bool, CofreError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM group_members WHERE group_id = ?1 AND principal_id = ?2",
                params![group_id, principal_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Add a member to a group. Adding an existing member is a no-op.
pub async fn add_member(db: &Database, group_id: i64, principal_id: i64) -> Result<(), CofreError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO group_members (group_id, principal_id) VALUES (?1, ?2)",
                params![group_id, principal_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a member from a group. Returns whether a membership existed.
///
/// The group key is not rotated; a removed member can no longer obtain
/// it through the registry but may have retained plaintext it already
/// decrypted.
pub async fn remove_member(
    db: &Database,
    group_id: i64,
    principal_id: i64,
) -> Result<bool, CofreError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let affected = conn.execute(
                "DELETE FROM group_members WHERE group_id = ?1 AND principal_id = ?2",
                params![group_id, principal_id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a group domain, its memberships, and all its ciphertext in one
/// transaction. The key is destroyed with the row; the data is gone for
/// good.
pub async fn delete_group(db: &Database, group_id: i64) -> Result<(), CofreError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM entries WHERE domain_kind = 'group' AND domain_id = ?1",
                params![group_id],
            )?;
            tx.execute("DELETE FROM group_domains WHERE id = ?1", params![group_id])?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::principals::create_principal;
    use tempfile::tempdir;

    async fn setup() -> (Database, i64, i64, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let owner = create_principal(&db, "owner", "h", "s", None, None)
            .await
            .unwrap();
        let member = create_principal(&db, "member", "h", "s", None, None)
            .await
            .unwrap();
        (db, owner, member, dir)
    }

    #[tokio::test]
    async fn create_group_enrolls_owner() {
        let (db, owner, _member, _dir) = setup().await;
        let group_id = create_group(&db, owner, "groupkey").await.unwrap();

        let group = get_group(&db, group_id).await.unwrap().unwrap();
        assert_eq!(group.owner_id, owner);
        assert_eq!(group.key_b64, "groupkey");
        assert!(is_member(&db, group_id, owner).await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn membership_add_and_remove() {
        let (db, owner, member, _dir) = setup().await;
        let group_id = create_group(&db, owner, "k").await.unwrap();

        assert!(!is_member(&db, group_id, member).await.unwrap());
        add_member(&db, group_id, member).await.unwrap();
        assert!(is_member(&db, group_id, member).await.unwrap());

        // Re-adding is a no-op.
        add_member(&db, group_id, member).await.unwrap();

        assert!(remove_member(&db, group_id, member).await.unwrap());
        assert!(!is_member(&db, group_id, member).await.unwrap());
        assert!(!remove_member(&db, group_id, member).await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_group_removes_entries_and_memberships() {
        let (db, owner, member, _dir) = setup().await;
        let group_id = create_group(&db, owner, "k").await.unwrap();
        add_member(&db, group_id, member).await.unwrap();

        crate::queries::entries::insert_entry(&db, "group", group_id, "label", "ct", "n")
            .await
            .unwrap();

        delete_group(&db, group_id).await.unwrap();

        assert!(get_group(&db, group_id).await.unwrap().is_none());
        assert!(!is_member(&db, group_id, member).await.unwrap());
        let remaining = crate::queries::entries::list_entries_for_domain(&db, "group", group_id)
            .await
            .unwrap();
        assert!(remaining.is_empty());

        db.close().await.unwrap();
    }
}
