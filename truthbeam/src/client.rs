//! Enrichment client
//!
//! A reqwest client for the Compass `/v1/enrich` operation, wrapped by
//! [`CacheableClient`] which fronts it with the bounded TTL cache. Unmapped
//! results are cached on purpose: a storm of identical unmappable events
//! costs one upstream call, not N.

use std::time::Duration;

use async_trait::async_trait;
use beacon_common::{ApiError, Compliance, EnrichmentRequest, EnrichmentResponse, Policy};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::cache::{ComplianceCache, MokaStore, CACHE_KEY_SEPARATOR};

/// Enrichment client error. Distinct from an unmapped result, which is a
/// value.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with its documented error envelope.
    #[error("enrichment API call failed with status {code}: {message}")]
    Api {
        /// Status code from the envelope.
        code: i32,
        /// Message from the envelope.
        message: String,
    },

    /// The service answered with something else entirely.
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// The upstream enrichment operation.
#[async_trait]
pub trait EnrichApi: Send + Sync {
    /// Call `POST /v1/enrich`.
    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichmentResponse, ClientError>;
}

/// HTTP client for the Compass enrichment service.
pub struct EnrichClient {
    base_url: String,
    client: reqwest::Client,
}

impl EnrichClient {
    /// Create a client for the given endpoint with a request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl EnrichApi for EnrichClient {
    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichmentResponse, ClientError> {
        debug!(
            policy_rule_id = %request.policy.policy_rule_id,
            policy_engine_name = %request.policy.policy_engine_name,
            "calling compass enrich API"
        );

        let url = format!("{}/v1/enrich", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response.json().await?);
        }

        match response.json::<ApiError>().await {
            Ok(envelope) => Err(ClientError::Api {
                code: envelope.code,
                message: envelope.message,
            }),
            Err(_) => Err(ClientError::UnexpectedStatus(status)),
        }
    }
}

/// Composite cache key: the key space distinguishes engines, so identical
/// rule ids across engines never alias.
pub fn cache_key(policy: &Policy) -> String {
    format!(
        "{}{}{}",
        policy.policy_engine_name, CACHE_KEY_SEPARATOR, policy.policy_rule_id
    )
}

/// Enrichment client with a bounded TTL cache in front.
pub struct CacheableClient {
    api: Box<dyn EnrichApi>,
    cache: Box<dyn ComplianceCache>,
}

impl CacheableClient {
    /// Create a cacheable client with the default moka store.
    pub fn new(api: Box<dyn EnrichApi>, ttl: Duration, capacity: u64) -> Self {
        Self::with_cache(api, Box::new(MokaStore::new(ttl, capacity)))
    }

    /// Create a cacheable client over a custom cache implementation.
    pub fn with_cache(api: Box<dyn EnrichApi>, cache: Box<dyn ComplianceCache>) -> Self {
        Self { api, cache }
    }

    /// Get compliance context for a policy, cached.
    ///
    /// Upstream results, including unmapped ones, are cached; transport and
    /// parse errors are returned to the caller and never cached. Dropping
    /// the returned future aborts an in-flight upstream call without
    /// populating the cache.
    pub async fn retrieve(&self, policy: &Policy) -> Result<Compliance, ClientError> {
        let key = cache_key(policy);

        if let Some(compliance) = self.cache.get(&key) {
            return Ok(compliance);
        }

        let request = EnrichmentRequest {
            policy: policy.clone(),
        };
        let response = match self.api.enrich(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    policy_rule_id = %policy.policy_rule_id,
                    policy_engine_name = %policy.policy_engine_name,
                    err = %e,
                    "enrichment API call failed"
                );
                return Err(e);
            }
        };

        let compliance = response.compliance;
        if let Err(e) = self.cache.set(&key, compliance.clone()) {
            warn!(
                policy_rule_id = %policy.policy_rule_id,
                policy_engine_name = %policy.policy_engine_name,
                err = %e,
                "failed to set cache value"
            );
        }

        Ok(compliance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fake upstream that counts calls and returns a canned response.
    pub(crate) struct CountingApi {
        pub calls: Arc<AtomicUsize>,
        pub response: Compliance,
        pub fail: bool,
    }

    #[async_trait]
    impl EnrichApi for CountingApi {
        async fn enrich(
            &self,
            _request: &EnrichmentRequest,
        ) -> Result<EnrichmentResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Api {
                    code: 500,
                    message: "boom".into(),
                });
            }
            Ok(EnrichmentResponse {
                compliance: self.response.clone(),
            })
        }
    }

    fn counting_client(
        response: Compliance,
        fail: bool,
    ) -> (CacheableClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let api = CountingApi {
            calls: calls.clone(),
            response,
            fail,
        };
        let client = CacheableClient::new(
            Box::new(api),
            Duration::from_secs(60),
            100,
        );
        (client, calls)
    }

    fn policy(engine: &str, rule: &str) -> Policy {
        Policy {
            policy_rule_id: rule.into(),
            policy_engine_name: engine.into(),
        }
    }

    #[test]
    fn test_cache_key_distinguishes_engines() {
        assert_ne!(
            cache_key(&policy("engine-a", "rule")),
            cache_key(&policy("engine-b", "rule"))
        );
        assert_eq!(cache_key(&policy("engine", "rule")), "engine:rule");
    }

    #[tokio::test]
    async fn test_second_retrieve_hits_cache() {
        let (client, calls) = counting_client(Compliance::unmapped(), false);
        let p = policy("engine", "rule");

        let first = client.retrieve(&p).await.unwrap();
        let second = client.retrieve(&p).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_engines_issue_distinct_upstream_calls() {
        let (client, calls) = counting_client(Compliance::unmapped(), false);

        client.retrieve(&policy("engine-a", "rule")).await.unwrap();
        client.retrieve(&policy("engine-b", "rule")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Matching the first query again is served from cache.
        client.retrieve(&policy("engine-a", "rule")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unmapped_results_are_negatively_cached() {
        let (client, calls) = counting_client(Compliance::unmapped(), false);
        let p = policy("engine", "unmappable");

        assert!(client.retrieve(&p).await.unwrap().is_unmapped());
        assert!(client.retrieve(&p).await.unwrap().is_unmapped());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_errors_are_not_cached() {
        let (client, calls) = counting_client(Compliance::unmapped(), true);
        let p = policy("engine", "rule");

        assert!(client.retrieve(&p).await.is_err());
        assert!(client.retrieve(&p).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Cache whose writes always fail.
    struct RejectingCache;

    impl ComplianceCache for RejectingCache {
        fn get(&self, _key: &str) -> Option<Compliance> {
            None
        }
        fn set(&self, _key: &str, _value: Compliance) -> Result<(), CacheError> {
            Err(CacheError("store rejected write".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cache_set_failure_does_not_fail_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let api = CountingApi {
            calls: calls.clone(),
            response: Compliance::unmapped(),
            fail: false,
        };
        let client = CacheableClient::with_cache(Box::new(api), Box::new(RejectingCache));

        let compliance = client.retrieve(&policy("engine", "rule")).await.unwrap();
        assert!(compliance.is_unmapped());
    }
}
