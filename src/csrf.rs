use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use fred::prelude::*;
use fred::types::Expiration;
use uuid::Uuid;

/// How long an issued token stays valid.
pub const CSRF_TTL_SECS: i64 = 900;

/// Maps an opaque token to the username it was issued for. Entries are
/// TTL-bounded and consumed by the first `verify` call, whatever its outcome.
#[derive(Clone)]
pub enum CsrfStore {
    Redis(Pool),
    Memory(Arc<Mutex<HashMap<String, MemoryEntry>>>),
}

#[derive(Debug, Clone)]
pub struct MemoryEntry {
    username: String,
    expires_at: Instant,
}

impl CsrfStore {
    /// Connect to redis at the given URL.
    pub async fn connect(url: &str) -> Result<Self, String> {
        let config = Config::from_url(url).map_err(|e| format!("invalid redis url: {e}"))?;
        let pool =
            Pool::new(config, None, None, None, 6).map_err(|e| format!("redis pool error: {e}"))?;
        pool.init()
            .await
            .map_err(|e| format!("failed to connect to redis: {e}"))?;
        Ok(CsrfStore::Redis(pool))
    }

    /// In-process store for when no redis is configured.
    pub fn in_memory() -> Self {
        CsrfStore::Memory(Arc::new(Mutex::new(HashMap::new())))
    }

    /// Issue a fresh token bound to `username`.
    pub async fn issue(&self, username: &str) -> Result<String, String> {
        let token = Uuid::new_v4().to_string();
        match self {
            CsrfStore::Redis(pool) => {
                let _: () = pool
                    .set(
                        format!("csrf:{token}"),
                        username,
                        Some(Expiration::EX(CSRF_TTL_SECS)),
                        None,
                        false,
                    )
                    .await
                    .map_err(|e| format!("csrf store write failed: {e}"))?;
            }
            CsrfStore::Memory(entries) => {
                let mut entries = entries
                    .lock()
                    .map_err(|_| "csrf store lock poisoned".to_string())?;
                let now = Instant::now();
                entries.retain(|_, entry| entry.expires_at > now);
                entries.insert(
                    token.clone(),
                    MemoryEntry {
                        username: username.to_string(),
                        expires_at: now + Duration::from_secs(CSRF_TTL_SECS as u64),
                    },
                );
            }
        }
        Ok(token)
    }

    /// Consume `token` and report whether it was live and issued for
    /// `username`. Missing, expired, already-consumed, and foreign tokens
    /// all come back `false`.
    pub async fn verify(&self, token: &str, username: &str) -> Result<bool, String> {
        match self {
            CsrfStore::Redis(pool) => {
                let stored: Option<String> = pool
                    .getdel(format!("csrf:{token}"))
                    .await
                    .map_err(|e| format!("csrf store read failed: {e}"))?;
                Ok(stored.as_deref() == Some(username))
            }
            CsrfStore::Memory(entries) => {
                let mut entries = entries
                    .lock()
                    .map_err(|_| "csrf store lock poisoned".to_string())?;
                Ok(match entries.remove(token) {
                    Some(entry) => entry.expires_at > Instant::now() && entry.username == username,
                    None => false,
                })
            }
        }
    }
}
