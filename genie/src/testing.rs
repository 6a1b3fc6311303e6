use std::sync::{Arc, Mutex};

use genie_core::prelude::*;

/// Answers like the server would, without a server
#[derive(Default)]
pub struct MockGateway {
    requests: Mutex<Vec<GenerationRequest>>,
    feedback: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn feedback_sent(&self) -> Vec<String> {
        self.feedback.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Gateway for MockGateway {
    async fn constraints(&self) -> anyhow::Result<Arc<Constraints>> {
        Ok(Arc::default())
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<GenerationResult> {
        self.requests.lock().unwrap().push(request.clone());
        match request.data_type {
            DataType::Tree => anyhow::bail!("tree generation is unavailable"),
            DataType::Matrix => Ok(GenerationResult::Text(String::from("1 2\n3 4"))),
            _ => Ok(GenerationResult::Json(serde_json::json!([1, 2]))),
        }
    }

    async fn feedback(&self, message: &str) -> anyhow::Result<String> {
        self.feedback.lock().unwrap().push(message.to_string());
        Ok(String::from("Feedback received"))
    }
}
