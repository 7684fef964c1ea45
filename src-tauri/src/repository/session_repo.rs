//! Session Repository
//!
//! Persists the JWT and user of the last login so the console can resume
//! without asking for credentials again.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::db::DbConnection;
use super::traits::SessionStore;
use crate::domain::{AuthUser, DomainError, DomainResult, Session};

pub struct SessionRepository {
    conn: DbConnection,
}

impl SessionRepository {
    pub fn new(conn: DbConnection) -> Self {
        Self { conn }
    }
}

fn storage_err(e: rusqlite::Error) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn save(&self, session: &Session) -> DomainResult<()> {
        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO session (id, jwt, user_json, saved_at) VALUES (1, ?1, ?2, ?3)",
            params![session.jwt, user_json, chrono::Utc::now().timestamp_millis()],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    /// A row that no longer parses is removed and reported as no session.
    async fn load(&self) -> DomainResult<Option<Session>> {
        let conn = self.conn.lock().await;
        let row: Option<(String, String)> = conn
            .query_row("SELECT jwt, user_json FROM session WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .map_err(storage_err)?;

        let Some((jwt, user_json)) = row else {
            return Ok(None);
        };
        match serde_json::from_str::<AuthUser>(&user_json) {
            Ok(user) if !jwt.is_empty() => Ok(Some(Session { jwt, user })),
            _ => {
                log::warn!("[auth] discarding unreadable saved session");
                conn.execute("DELETE FROM session", ()).map_err(storage_err)?;
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM session", ()).map_err(storage_err)?;
        Ok(())
    }
}
