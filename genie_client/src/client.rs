use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;

use genie_core::prelude::*;

/// Talks to the TestGenie API.
///
/// Cloning is cheap and clones share the constraints cache.
#[derive(Clone)]
pub struct ApiClient {
    agent: reqwest::Client,
    endpoints: Arc<Endpoints>,
    constraints: Arc<Mutex<Option<Arc<Constraints>>>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(genie_core::USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            agent: builder.build()?,
            endpoints: Arc::new(config.endpoints()?),
            constraints: <_>::default(),
        })
    }

    /// Fetches the constraints once, later calls get the cached copy
    pub async fn fetch_constraints(&self) -> anyhow::Result<Arc<Constraints>> {
        let mut cached = self.constraints.lock().await;
        if let Some(constraints) = &*cached {
            log::trace!("using cached constraints");
            return Ok(Arc::clone(constraints));
        }

        let url = &self.endpoints.constraints;
        log::debug!("GET {url}");
        let constraints: Constraints = self
            .agent
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| "cannot read the constraints")?;

        let constraints = Arc::new(constraints);
        *cached = Some(Arc::clone(&constraints));
        Ok(constraints)
    }

    pub async fn invalidate_constraints(&self) {
        if self.constraints.lock().await.take().is_some() {
            log::debug!("dropped cached constraints");
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<GenerationResult> {
        let url = &self.endpoints.generate;
        log::debug!(
            "POST {url} ({} as {})",
            request.data_type,
            request.output_format
        );

        let body = self
            .agent
            .post(url.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        log::trace!("received {} bytes", body.len());
        Ok(GenerationResult::from_body(body))
    }

    pub async fn submit_feedback(&self, message: &str) -> anyhow::Result<String> {
        let url = &self.endpoints.feedback;
        log::debug!("POST {url}");

        let ack = self
            .agent
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(message.to_string())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        log::trace!("feedback ack: {ack}");
        Ok(ack)
    }
}

#[async_trait::async_trait]
impl Gateway for ApiClient {
    async fn constraints(&self) -> anyhow::Result<Arc<Constraints>> {
        self.fetch_constraints().await
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<GenerationResult> {
        Self::generate(self, request).await
    }

    async fn feedback(&self, message: &str) -> anyhow::Result<String> {
        self.submit_feedback(message).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use axum::{
        http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
        Extension, Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    const CONSTRAINTS: &str = r#"{
        "dataTypes": ["ARRAY", "STRING", "MATRIX", "TREE"],
        "outputFormats": ["JSON", "CSV", "PLAIN_TEXT"],
        "defaults": { "matrix": { "rows": 3, "columns": 3 } }
    }"#;

    #[derive(Clone, Default)]
    struct Seen {
        constraint_hits: Arc<AtomicUsize>,
        generated: Arc<Mutex<Vec<Value>>>,
        feedback: Arc<Mutex<Vec<(String, String)>>>,
    }

    async fn constraints(Extension(seen): Extension<Seen>) -> Response {
        // the very first request fails so tests can see errors are not cached
        match seen.constraint_hits.fetch_add(1, Ordering::SeqCst) {
            0 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            _ => CONSTRAINTS.into_response(),
        }
    }

    async fn generate(Extension(seen): Extension<Seen>, Json(body): Json<Value>) -> Response {
        let data_type = body["dataType"].as_str().unwrap_or_default().to_string();
        seen.generated.lock().unwrap().push(body);
        match &*data_type {
            "ARRAY" => "[3, 1, 2]".into_response(),
            "MATRIX" => "1,2\n3,4".into_response(),
            "STRING" => r#""abc""#.into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        }
    }

    async fn feedback(
        Extension(seen): Extension<Seen>,
        headers: HeaderMap,
        body: String,
    ) -> &'static str {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|c| c.to_str().ok())
            .unwrap_or_default()
            .to_string();
        seen.feedback.lock().unwrap().push((content_type, body));
        "Feedback received"
    }

    fn serve(seen: &Seen) -> ApiClient {
        let router = Router::new()
            .route("/api/v1/constraints", get(constraints))
            .route("/api/v1/generate", post(generate))
            .route("/api/v1/feedback", post(feedback))
            .layer(Extension(seen.clone()));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(router.into_make_service());
        tokio::spawn(server);

        let config = ApiConfig::default()
            .with_api_url(&format!("http://{addr}"))
            .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn constraints_are_cached_after_success() {
        let seen = Seen::default();
        let client = serve(&seen);

        assert!(client.fetch_constraints().await.is_err());

        let first = client.fetch_constraints().await.unwrap();
        let second = client.clone().fetch_constraints().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.supports_data_type(DataType::Tree));
        assert_eq!(first.defaults.matrix.as_ref().unwrap().rows, Some(3));
        assert_eq!(seen.constraint_hits.load(Ordering::SeqCst), 2);

        client.invalidate_constraints().await;
        let third = client.fetch_constraints().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(seen.constraint_hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn generate_posts_the_snapshot() {
        let seen = Seen::default();
        let client = serve(&seen);

        let mut builder = RequestBuilder::default();
        builder.set_range(1, 3).set_flag(Field::AllowDuplicates, false);
        let request = builder.snapshot();

        let result = client.generate(&request).await.unwrap();
        assert_eq!(result, GenerationResult::Json(json!([3, 1, 2])));

        let generated = seen.generated.lock().unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(
            generated[0],
            json!({
                "dataType": "ARRAY",
                "size": 10,
                "minValue": 1,
                "maxValue": 3,
                "allowDuplicates": false,
                "isSorted": false,
                "outputFormat": "JSON",
                "elementType": "NUMBER",
            })
        );
    }

    #[tokio::test]
    async fn text_results_are_verbatim() {
        let seen = Seen::default();
        let client = serve(&seen);

        let mut builder = RequestBuilder::default();
        builder
            .set_data_type(DataType::Matrix)
            .set_output_format(OutputFormat::Csv);
        let result = client.generate(&builder.snapshot()).await.unwrap();
        assert_eq!(result.to_string(), "1,2\n3,4");

        builder.set_data_type(DataType::String);
        let result = client.generate(&builder.snapshot()).await.unwrap();
        assert_eq!(result, GenerationResult::Text(String::from("abc")));
    }

    #[tokio::test]
    async fn server_errors_surface() {
        let seen = Seen::default();
        let client = serve(&seen);

        let mut builder = RequestBuilder::default();
        builder.set_data_type(DataType::Tree);
        assert!(client.generate(&builder.snapshot()).await.is_err());

        builder.set_data_type(DataType::Array);
        assert!(client.generate(&builder.snapshot()).await.is_ok());
        assert_eq!(seen.generated.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn feedback_is_plain_text() {
        let seen = Seen::default();
        let client = serve(&seen);

        let ack = client
            .submit_feedback("sorted arrays look great")
            .await
            .unwrap();
        assert_eq!(ack, "Feedback received");

        let feedback = seen.feedback.lock().unwrap();
        assert_eq!(
            &*feedback,
            &[(
                String::from("text/plain"),
                String::from("sorted arrays look great")
            )]
        );
    }

    #[tokio::test]
    async fn unreachable_server() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let config = ApiConfig::default()
            .with_api_url(&format!("http://{addr}"))
            .unwrap();
        let client = ApiClient::new(&config).unwrap();

        assert!(client.fetch_constraints().await.is_err());
        assert!(client
            .generate(&RequestBuilder::default().snapshot())
            .await
            .is_err());
    }
}
