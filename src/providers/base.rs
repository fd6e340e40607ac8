use crate::errors::Result;
use crate::models::quote::{InstrumentKind, SpotRecord};
use async_trait::async_trait;

/// Base trait for realtime spot quote providers
#[async_trait]
pub trait SpotProvider {
    /// Get the provider code this provider is for
    fn provider_code(&self) -> &'static str;

    /// Fetch the full realtime spot table for the given instrument kind
    async fn fetch_spot(&self, kind: InstrumentKind) -> Result<Vec<SpotRecord>>;
}
