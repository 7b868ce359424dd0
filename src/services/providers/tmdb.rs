//! TMDB (The Movie Database) provider
//!
//! Thin client over the TMDB v3 REST API. Every request carries the server's
//! API key as a query parameter and is bounded by the client timeout. Genre
//! lists and movie details go through the Redis cache when one is configured.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{DiscoverQuery, Movie, MoviePage, TimeWindow},
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbProvider {
    /// Creates a TMDB provider
    ///
    /// `timeout` bounds every outbound request. Pass `cache: None` or a zero
    /// `cache_ttl` to disable metadata caching.
    pub fn new(
        api_key: String,
        api_url: String,
        timeout: Duration,
        cache: Option<Cache>,
        cache_ttl: u64,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache: cache.filter(|_| cache_ttl > 0),
            cache_ttl,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET and returns the JSON body, failing on any non-2xx status
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                provider = "tmdb",
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Like `get_json`, but served from the cache when possible
    async fn get_json_cached(&self, key: CacheKey, path: &str) -> AppResult<Value> {
        match &self.cache {
            Some(cache) => cached!(cache, key, self.cache_ttl, self.get_json(path, &[])),
            None => self.get_json(path, &[]).await,
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Value> {
        self.get_json("/discover/movie", &query.to_params()).await
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<Value> {
        let results = self
            .get_json(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            query = %query,
            page,
            results = results["results"].as_array().map(|r| r.len()).unwrap_or(0),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(results)
    }

    async fn trending(&self, window: TimeWindow) -> AppResult<Value> {
        self.get_json(&format!("/trending/movie/{}", window.as_str()), &[])
            .await
    }

    async fn movie_details(&self, movie_id: i64) -> AppResult<Value> {
        self.get_json_cached(
            CacheKey::MovieDetails(movie_id),
            &format!("/movie/{}", movie_id),
        )
        .await
    }

    async fn genres(&self) -> AppResult<Value> {
        self.get_json_cached(CacheKey::GenreList, "/genre/movie/list")
            .await
    }

    async fn recommendations(&self, movie_id: i64) -> AppResult<Vec<Movie>> {
        let body = self
            .get_json(&format!("/movie/{}/recommendations", movie_id), &[])
            .await?;

        let page: MoviePage = serde_json::from_value(body).map_err(|e| {
            AppError::ExternalApi(format!(
                "Malformed TMDB recommendations for movie {}: {}",
                movie_id, e
            ))
        })?;

        tracing::debug!(
            movie_id,
            results = page.results.len(),
            provider = "tmdb",
            "Recommendations fetched"
        );

        Ok(page.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::redis::cache::tests::{silent_redis_url, TEST_IO_TIMEOUT};

    fn create_test_provider() -> TmdbProvider {
        TmdbProvider::new(
            "test_key".to_string(),
            "http://tmdb.test/3/".to_string(),
            Duration::from_secs(1),
            None,
            3600,
        )
        .unwrap()
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let provider = create_test_provider();
        assert_eq!(provider.url("/movie/603"), "http://tmdb.test/3/movie/603");
    }

    #[test]
    fn test_name() {
        assert_eq!(create_test_provider().name(), "tmdb");
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let client = crate::db::create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client, TEST_IO_TIMEOUT);

        let provider = TmdbProvider::new(
            "test_key".to_string(),
            "http://tmdb.test/3".to_string(),
            Duration::from_secs(1),
            Some(cache),
            0,
        )
        .unwrap();

        assert!(provider.cache.is_none());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_error() {
        let provider = TmdbProvider::new(
            "test_key".to_string(),
            "http://127.0.0.1:1".to_string(),
            Duration::from_secs(1),
            None,
            0,
        )
        .unwrap();

        let result = provider.genres().await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }

    #[tokio::test]
    async fn test_stalled_cache_falls_through_to_upstream() {
        let client = crate::db::create_redis_client(&silent_redis_url().await).unwrap();
        let (cache, handle) = Cache::new(client, TEST_IO_TIMEOUT);

        let provider = TmdbProvider::new(
            "test_key".to_string(),
            "http://127.0.0.1:1".to_string(),
            Duration::from_secs(1),
            Some(cache),
            3600,
        )
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(3), provider.genres())
            .await
            .expect("genre lookup should not hang on a stalled cache");
        assert!(matches!(result, Err(AppError::HttpClient(_))));

        handle.shutdown().await;
    }
}
