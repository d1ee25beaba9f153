use crate::llm::Provider;
use std::fmt;

/// Uniform failure for a single provider call. Callers are not expected to
/// distinguish the cause, only to decide whether to fall back; `stage` and
/// `detail` exist for the logs.
#[derive(Debug, Clone)]
pub struct ProviderCallError {
    pub provider: Provider,
    pub stage: &'static str,
    pub detail: String,
}

impl fmt::Display for ProviderCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "provider call failed (provider={}, stage={}): {}",
            self.provider.name(),
            self.stage,
            self.detail
        )
    }
}

impl std::error::Error for ProviderCallError {}
