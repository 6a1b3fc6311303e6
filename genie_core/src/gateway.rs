use std::sync::Arc;

use crate::{constraints::Constraints, request::GenerationRequest, result::GenerationResult};

/// The three calls the form makes against the TestGenie API
#[async_trait::async_trait]
pub trait Gateway
where
    Self: Send + Sync,
{
    async fn constraints(&self) -> anyhow::Result<Arc<Constraints>>;
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<GenerationResult>;
    async fn feedback(&self, message: &str) -> anyhow::Result<String>;
}
