//! Networked backing store using Redis.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use redis::{AsyncCommands, RedisResult, aio::ConnectionManager};
use tracing::info;

use crate::cache::store::{CacheError, CacheStore};

/// Store sobre Redis. La conexion se reestablece sola tras caidas; cada
/// comando queda acotado por `command_timeout`.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    command_timeout: Duration,
}

impl RedisStore {
    /// Conecta con el servidor indicado en `url` (`redis://host:port/db`).
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(|e| CacheError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let conn = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout {
                command: "CONNECT",
                timeout: connect_timeout,
            })?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        info!("Connected to Redis");
        Ok(Self {
            conn,
            command_timeout,
        })
    }

    async fn run<T, F>(&self, command: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.command_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::command(command, e)),
            Err(_) => Err(CacheError::Timeout {
                command,
                timeout: self.command_timeout,
            }),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = self
            .run("GET", async move { conn.get::<_, Option<Vec<u8>>>(key).await })
            .await?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let millis = (ttl.as_millis() as u64).max(1);
        self.run("PSETEX", async move {
            conn.pset_ex::<_, _, ()>(key, &value[..], millis).await
        })
        .await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn.clone();
        self.run("KEYS", async move { conn.keys::<_, Vec<String>>(pattern).await })
            .await
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let keys = keys.to_vec();
        self.run("DEL", async move { conn.del::<_, u64>(keys).await }).await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = self
            .run("PING", async move {
                let pong: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                pong
            })
            .await?;
        Ok(())
    }
}
