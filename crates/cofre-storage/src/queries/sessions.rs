// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.
//!
//! Idle expiry is enforced in SQL: a session whose `last_used_at` is
//! older than the idle timeout resolves as absent and its row is removed
//! on the spot. Resolution touches `last_used_at` for live sessions, so
//! the timeout is a sliding window.

use cofre_core::CofreError;
use rusqlite::params;

use crate::database::Database;
use crate::models::SessionRow;

/// Create a new session row.
pub async fn create_session(
    db: &Database,
    token: &str,
    principal_id: i64,
    key_b64: &str,
) -> Result<(), CofreError> {
    let token = token.to_string();
    let key_b64 = key_b64.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO sessions (token, principal_id, key_b64) VALUES (?1, ?2, ?3)",
                params![token, principal_id, key_b64],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve a session token, enforcing the idle timeout.
///
/// An expired row is deleted and `None` returned; a live row has its
/// `last_used_at` advanced to now before being returned. A timeout of 0
/// disables idle expiry.
pub async fn resolve_session(
    db: &Database,
    token: &str,
    idle_timeout_secs: u64,
) -> Result<Option<SessionRow>, CofreError> {
    let token = token.to_string();
    let cutoff_modifier = format!("-{idle_timeout_secs} seconds");
    db.connection()
        .call(move |conn| -> Result<Option<SessionRow>, rusqlite::Error> {
            if idle_timeout_secs > 0 {
                conn.execute(
                    "DELETE FROM sessions
                     WHERE token = ?1
                       AND last_used_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?2)",
                    params![token, cutoff_modifier],
                )?;
            }
            let result = conn.query_row(
                "SELECT token, principal_id, key_b64, created_at, last_used_at
                 FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    Ok(SessionRow {
                        token: row.get(0)?,
                        principal_id: row.get(1)?,
                        key_b64: row.get(2)?,
                        created_at: row.get(3)?,
                        last_used_at: row.get(4)?,
                    })
                },
            );
            match result {
                Ok(session) => {
                    conn.execute(
                        "UPDATE sessions
                         SET last_used_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE token = ?1",
                        params![token],
                    )?;
                    Ok(Some(session))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete one session. Returns whether a row existed.
pub async fn delete_session(db: &Database, token: &str) -> Result<bool, CofreError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let affected = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every session belonging to a principal. Returns the count.
pub async fn delete_sessions_for_principal(
    db: &Database,
    principal_id: i64,
) -> Result<usize, CofreError> {
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM sessions WHERE principal_id = ?1",
                params![principal_id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
