/// A macro to simplify caching logic using Redis.
///
/// This macro checks if a value is present in the cache.
/// If found, it returns the cached value.
/// If not found, it executes the provided future to compute the value,
/// schedules a background write, and then returns the computed value.
///
/// Cache failures never fail the caller: read errors are logged and treated
/// as a miss, and a `None` cache always computes the value.
///
/// # Arguments
/// * `$cache`: An `Option<&Cache>`.
/// * `$key`: The `CacheKey` to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```ignore
/// let places = cached!(self.cache.as_ref(), key, 3600, self.fetch_places(query));
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                    None
                }
            },
            None => None,
        };

        match hit {
            Some(cached) => Ok(cached),
            None => {
                let value = $block.await?;
                if let Some(cache) = $cache {
                    cache.set_in_background(&key, &value, $ttl);
                }
                Ok(value)
            }
        }
    }};
}
