use std::path::{Path, PathBuf};

use anyhow::Context;
use genie_core::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed(String),
}

/// One pass through the form: what was entered and what came back
#[derive(Debug, Default)]
pub struct Session {
    builder: RequestBuilder,
    status: Status,
    result: Option<GenerationResult>,
}

impl Session {
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The latest result, kept through later failures
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// Sends the current snapshot, the last response wins
    pub async fn submit<G>(&mut self, gateway: &G) -> &Status
    where
        G: Gateway + ?Sized,
    {
        let request = self.builder.snapshot();
        self.status = Status::Pending;

        self.status = match gateway.generate(&request).await {
            Ok(result) => {
                self.result.replace(result);
                Status::Ready
            }
            Err(err) => {
                log::warn!("cannot generate a test case: {err:#}");
                Status::Failed(err.to_string())
            }
        };
        &self.status
    }

    /// Writes the latest result to `path`, or to `testcase.<format>` by default
    pub async fn export(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let result = self
            .result
            .as_ref()
            .with_context(|| "there is no result to export yet")?;

        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(self.builder.output_format().file_name()));

        tokio::fs::write(&path, result.display().as_bytes())
            .await
            .with_context(|| format!("cannot write to {}", path.display()))?;

        log::debug!("exported result to {}", path.display());
        Ok(path)
    }
}
