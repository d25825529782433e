use crate::error::BankError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use headers::{CacheControl, HeaderMapExt};
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use reqwest::header::HeaderMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Used when the key endpoint sends no usable `Cache-Control: max-age`.
const FALLBACK_TTL_SECS: i64 = 3600;

struct CachedKeys {
    keys: JwkSet,
    expires_at: DateTime<Utc>,
}

impl CachedKeys {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    fn key_for(&self, kid: &str) -> Result<DecodingKey, BankError> {
        let jwk = self
            .keys
            .find(kid)
            .ok_or_else(|| BankError::InvalidIdToken(format!("unknown signing key '{kid}'")))?;
        Ok(DecodingKey::from_jwk(jwk)?)
    }
}

/// Public signing keys fetched from a JWKS endpoint, kept for as long as the
/// endpoint's `max-age` allows. Verification results themselves are never cached.
pub struct JwksCache {
    url: String,
    http: reqwest::Client,
    cached: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    pub fn new(url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            http,
            cached: RwLock::new(None),
        }
    }

    /// Look up the decoding key for `kid`.
    ///
    /// The key set is only refetched once it has expired; an unknown `kid` against a
    /// fresh set is rejected outright.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, BankError> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref()
                && entry.is_fresh(Utc::now())
            {
                return entry.key_for(kid);
            }
        }

        let mut cached = self.cached.write().await;
        // Another caller may have refreshed while this one waited for the lock.
        if let Some(entry) = cached.as_ref()
            && entry.is_fresh(Utc::now())
        {
            return entry.key_for(kid);
        }
        let entry = self.fetch().await?;
        let key = entry.key_for(kid);
        *cached = Some(entry);
        key
    }

    async fn fetch(&self) -> Result<CachedKeys, BankError> {
        let resp = self
            .http
            .get(self.url.as_str())
            .send()
            .await?
            .error_for_status()?;
        let ttl = ttl_from(resp.headers());
        let keys: JwkSet = resp.json().await?;
        debug!(url = %self.url, ttl_secs = ttl.num_seconds(), "fetched signing keys");
        info!(count = keys.keys.len(), "refreshed token signing keys");
        Ok(CachedKeys {
            keys,
            expires_at: Utc::now() + ttl,
        })
    }
}

fn ttl_from(headers: &HeaderMap) -> ChronoDuration {
    headers
        .typed_get::<CacheControl>()
        .and_then(|cc| cc.max_age())
        .and_then(|d| ChronoDuration::from_std(d).ok())
        .unwrap_or_else(|| ChronoDuration::seconds(FALLBACK_TTL_SECS))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderValue, header};
    use axum::routing::get;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) const TEST_JWKS: &str = include_str!("../../testdata/id_token_signing_jwks.json");
    pub(crate) const TEST_KID: &str = "test-key-1";

    pub(crate) fn local_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("failed to build test client")
    }

    /// Serve `TEST_JWKS` on a loopback port; returns its URL and a fetch counter.
    pub(crate) async fn serve_keys(cache_control: Option<&'static str>) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/keys",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let mut headers = HeaderMap::new();
                    headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                    if let Some(value) = cache_control {
                        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(value));
                    }
                    (headers, TEST_JWKS)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}/keys"), hits)
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected_without_refetching_fresh_keys() {
        let (url, hits) = serve_keys(Some("public, max-age=3600")).await;
        let cache = JwksCache::new(url, local_client());

        assert!(cache.decoding_key(TEST_KID).await.is_ok());
        for i in 0..5 {
            let err = cache
                .decoding_key(&format!("rotated-{i}"))
                .await
                .err()
                .expect("unknown kid should be rejected");
            assert!(matches!(err, BankError::InvalidIdToken(_)));
        }
        assert!(cache.decoding_key(TEST_KID).await.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_keys_are_refetched() {
        let (url, hits) = serve_keys(Some("max-age=0")).await;
        let cache = JwksCache::new(url, local_client());

        assert!(cache.decoding_key(TEST_KID).await.is_ok());
        assert!(cache.decoding_key(TEST_KID).await.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_fetch() {
        let (url, hits) = serve_keys(Some("max-age=600")).await;
        let cache = Arc::new(JwksCache::new(url, local_client()));

        let lookups: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.decoding_key(TEST_KID).await.is_ok() })
            })
            .collect();
        for lookup in lookups {
            assert!(lookup.await.expect("lookup panicked"));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ttl_follows_max_age() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=19800, must-revalidate, no-transform"),
        );
        assert_eq!(ttl_from(&headers), ChronoDuration::seconds(19800));
    }

    #[test]
    fn ttl_falls_back_without_max_age() {
        assert_eq!(
            ttl_from(&HeaderMap::new()),
            ChronoDuration::seconds(FALLBACK_TTL_SECS)
        );

        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        assert_eq!(ttl_from(&headers), ChronoDuration::seconds(FALLBACK_TTL_SECS));
    }
}
