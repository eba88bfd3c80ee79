//! Stream processor
//!
//! Walks a log batch record by record: extract the policy evidence, fetch
//! compliance context through the cached client, apply it back onto the
//! record. Every per-record failure is logged and the record passes through
//! unmodified; the batch itself never fails.

use tracing::error;

use crate::applier::Applier;
use crate::client::{CacheableClient, ClientError, EnrichClient};
use crate::config::TruthBeamConfig;
use crate::pdata::LogsData;

/// Log processor enriching policy evidence with compliance context.
///
/// Mutates records in place; the host pipeline must not assume the batch is
/// immutable. All cross-batch state lives in the client's cache, so one
/// processor may be driven from multiple pipeline workers, each with its
/// own batch.
pub struct TruthBeamProcessor {
    client: CacheableClient,
    applier: Applier,
}

impl TruthBeamProcessor {
    /// Build a processor from validated configuration.
    pub fn new(config: &TruthBeamConfig) -> Result<Self, ClientError> {
        let api = EnrichClient::new(&config.endpoint, config.timeout)?;
        let client = CacheableClient::new(Box::new(api), config.cache_ttl, config.cache_capacity);
        Ok(Self::with_client(client))
    }

    /// Build a processor over an existing client.
    pub fn with_client(client: CacheableClient) -> Self {
        Self {
            client,
            applier: Applier::new(),
        }
    }

    /// Enrich every record in the batch, in order.
    ///
    /// Cancelling (dropping) the returned future mid-batch leaves the
    /// records already enriched in place and stops further work; that is
    /// not an error.
    pub async fn process_logs(&self, logs: &mut LogsData) {
        for resource_logs in &mut logs.resource_logs {
            for scope_logs in &mut resource_logs.scope_logs {
                for record in &mut scope_logs.log_records {
                    let (policy, result) = match self.applier.extract(record) {
                        Ok(extracted) => extracted,
                        Err(e) => {
                            error!(err = %e, "failed to extract evidence from log record");
                            continue;
                        }
                    };

                    let compliance = match self.client.retrieve(&policy).await {
                        Ok(compliance) => compliance,
                        Err(e) => {
                            // Do not fail the batch; the record passes
                            // through unenriched rather than being dropped.
                            error!(
                                policy_id = %policy.policy_rule_id,
                                err = %e,
                                "failed to get enrichment"
                            );
                            continue;
                        }
                    };

                    if let Err(e) = self.applier.apply(record, &compliance, &result) {
                        error!(
                            policy_id = %policy.policy_rule_id,
                            err = %e,
                            "failed to apply enrichment"
                        );
                    }
                }
            }
        }
    }
}
