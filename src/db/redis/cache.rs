use redis::AsyncCommands;
use redis::Client;
use redis::ErrorKind;
use redis::RedisError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for cached metadata responses
///
/// Only slow-changing catalog data is cached. Per-user results never are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    GenreList,
    MovieDetails(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::GenreList => write!(f, "tmdb:genres:movie"),
            CacheKey::MovieDetails(id) => write!(f, "tmdb:movie:{}", id),
        }
    }
}

/// Creates a Redis client for caching
///
/// The client connects lazily, so an unreachable Redis only shows up as
/// cache read/write failures.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Builds the metadata cache, or nothing when caching is disabled (`ttl == 0`)
///
/// `io_timeout` bounds every Redis round trip, connection setup included.
pub fn create_metadata_cache(
    redis_url: &str,
    ttl: u64,
    io_timeout: Duration,
) -> anyhow::Result<Option<(Cache, CacheWriterHandle)>> {
    if ttl == 0 {
        return Ok(None);
    }

    let client = create_redis_client(redis_url)?;
    Ok(Some(Cache::new(client, io_timeout)))
}

/// Runs a Redis operation, failing with an I/O error once `limit` elapses
async fn bounded<T>(
    limit: Duration,
    operation: impl Future<Output = Result<T, RedisError>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::Cache(RedisError::from((
            ErrorKind::IoError,
            "Redis operation timed out",
        )))),
    }
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    io_timeout: Duration,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until queued writes are flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// Writes go through a channel to a spawned task so caching never adds
    /// latency to API responses. Reads and writes give up after `io_timeout`.
    pub fn new(redis_client: Client, io_timeout: Duration) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(client, io_timeout, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            io_timeout,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    /// Background task that processes cache write messages
    ///
    /// On shutdown it drains whatever is already queued and exits without
    /// waiting for senders to go away.
    async fn cache_writer_task(
        client: Client,
        io_timeout: Duration,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, io_timeout, msg).await {
                        tracing::warn!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    let mut flushed = 0usize;
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, io_timeout, msg).await {
                            tracing::warn!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message to Redis
    async fn write_to_redis(
        client: &Client,
        io_timeout: Duration,
        msg: CacheWriteMessage,
    ) -> AppResult<()> {
        bounded(io_timeout, async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
            Ok::<(), RedisError>(())
        })
        .await
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss. A Redis that does not answer within the
    /// I/O timeout is reported as a `Cache` error.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = bounded(self.io_timeout, async {
            let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
            conn.get(key.to_string()).await
        })
        .await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for a background write and returns immediately
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::net::TcpListener;

    pub(crate) const TEST_IO_TIMEOUT: Duration = Duration::from_millis(200);

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// A Redis URL pointing at a listener that accepts connections and never answers
    pub(crate) async fn silent_redis_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("redis://{}", addr)
    }

    #[test]
    fn test_cache_key_display_genre_list() {
        assert_eq!(CacheKey::GenreList.to_string(), "tmdb:genres:movie");
    }

    #[test]
    fn test_cache_key_display_movie_details() {
        assert_eq!(CacheKey::MovieDetails(603).to_string(), "tmdb:movie:603");
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_an_error_not_a_panic() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client, TEST_IO_TIMEOUT);

        let result: AppResult<Option<serde_json::Value>> =
            cache.get_from_cache(&CacheKey::GenreList).await;
        assert!(matches!(result, Err(AppError::Cache(_))));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_stalled_redis_read_times_out() {
        let client = create_redis_client(&silent_redis_url().await).unwrap();
        let (cache, handle) = Cache::new(client, TEST_IO_TIMEOUT);

        let result: AppResult<Option<serde_json::Value>> = tokio::time::timeout(
            Duration::from_secs(2),
            cache.get_from_cache(&CacheKey::GenreList),
        )
        .await
        .expect("cache read should give up on its own");
        assert!(matches!(result, Err(AppError::Cache(_))));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_stalled_redis_write_does_not_block_shutdown() {
        let client = create_redis_client(&silent_redis_url().await).unwrap();
        let (cache, handle) = Cache::new(client, TEST_IO_TIMEOUT);

        cache.set_in_background(&CacheKey::MovieDetails(1), &serde_json::json!({ "id": 1 }), 60);

        tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
            .await
            .expect("shutdown should finish once pending writes time out");
    }

    #[tokio::test]
    async fn test_zero_ttl_builds_no_cache() {
        let cache = create_metadata_cache("redis://127.0.0.1:1", 0, TEST_IO_TIMEOUT).unwrap();
        assert!(cache.is_none());
    }

    #[tokio::test]
    async fn test_positive_ttl_builds_cache() {
        let (_cache, handle) = create_metadata_cache("redis://127.0.0.1:1", 60, TEST_IO_TIMEOUT)
            .unwrap()
            .unwrap();
        handle.shutdown().await;
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_in_background_writes_to_cache() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone(), TEST_IO_TIMEOUT);

        let key = CacheKey::MovieDetails(-1);
        let value = serde_json::json!({ "id": -1, "title": "cache test" });

        cache.set_in_background(&key, &value, 60);
        handle.shutdown().await;

        let retrieved: Option<serde_json::Value> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client, TEST_IO_TIMEOUT);

        let retrieved: Option<serde_json::Value> = cache
            .get_from_cache(&CacheKey::MovieDetails(-404))
            .await
            .unwrap();
        assert_eq!(retrieved, None);
    }
}
