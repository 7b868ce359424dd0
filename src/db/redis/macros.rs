/// Read-through caching for metadata responses.
///
/// Looks the key up in the cache and returns the hit. On a miss the block is
/// awaited, its value queued for a background write, and returned. A failed
/// cache read is logged and treated as a miss so Redis trouble never fails a
/// request.
///
/// # Arguments
/// * `$cache`: cache with `get_from_cache` and `set_in_background`.
/// * `$key`: `CacheKey` for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing an `AppResult` of the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let genres: Value = cached!(cache, CacheKey::GenreList, 3600, self.fetch_genres())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, fetching upstream");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&$key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
