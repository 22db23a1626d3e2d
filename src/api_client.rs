//! Client for OpenAI-compatible Tenstorrent deployments
//!
//! Builds the same request bodies the server's normalizer consumes, attaches
//! a bearer token, and hands back the raw transport response. Status codes and
//! bodies are not interpreted here; that is left to the caller.
//!
//! ```ignore
//! use tt_local::api_client::{ApiClient, EnvironmentOptions, GenerationOptions};
//! use tt_local::schemas::chat_completions::ChatMessage;
//!
//! let client = ApiClient::from_environment("local-tenstorrent", EnvironmentOptions::default())?;
//! let response = client
//!     .create_chat_completion(&[ChatMessage::user("Hello")], GenerationOptions::default())
//!     .await?;
//! ```
use crate::client::{HttpClient, HyperClient, create_hyper_client};
use crate::errors::Error;
use crate::schemas::chat_completions::{ChatMessage, ChatRequest};
use crate::schemas::completions::CompletionRequest;
use crate::schemas::embeddings::EmbeddingRequest;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use bon::Builder;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_BASE_URL_ENV: &str = "KOYEB_TT_BASE_URL";
pub const DEFAULT_API_KEY_ENV: &str = "KOYEB_TT_API_KEY";
/// Key used when the key variable is unset; stub deployments accept anything.
pub const DEFAULT_API_KEY: &str = "fake";

const API_VERSION_SUFFIX: &str = "/v1";

/// Where [`ApiClient::from_environment`] looks for its settings.
#[derive(Debug, Clone, Builder)]
pub struct EnvironmentOptions {
    #[builder(default = DEFAULT_BASE_URL_ENV.to_string())]
    pub base_url_env: String,
    #[builder(default = DEFAULT_API_KEY_ENV.to_string())]
    pub api_key_env: String,
    #[builder(default = DEFAULT_API_KEY.to_string())]
    pub default_api_key: String,
    pub timeout: Option<Duration>,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Optional generation parameters for chat and text completions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Builder)]
pub struct GenerationOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    #[builder(default)]
    pub stream: bool,
}

#[derive(Debug, Clone)]
pub struct ApiClient<T: HttpClient = HyperClient> {
    http_client: T,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
}

impl ApiClient<HyperClient> {
    /// Create a client backed by the default hyper transport.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        Self::with_client(create_hyper_client(), base_url, api_key, model, timeout)
    }

    /// Create a client from process environment variables.
    pub fn from_environment(
        model: impl Into<String>,
        options: EnvironmentOptions,
    ) -> Result<Self, Error> {
        Self::from_lookup(model, options, |name| std::env::var(name).ok())
    }

    /// Like [`ApiClient::from_environment`], reading variables through `lookup`.
    pub fn from_lookup<F>(
        model: impl Into<String>,
        options: EnvironmentOptions,
        lookup: F,
    ) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(&options.base_url_env)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::MissingEnvironment(options.base_url_env.clone()))?;
        let api_key = lookup(&options.api_key_env).unwrap_or(options.default_api_key);

        Self::new(base_url, api_key, model, options.timeout)
    }
}

impl<T: HttpClient> ApiClient<T> {
    /// Create a client with a custom transport (useful for testing).
    pub fn with_client(
        http_client: T,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let base_url = base_url.into();
        let model = model.into();

        if base_url.trim().is_empty() {
            return Err(Error::InvalidArgument("Base URL"));
        }
        if model.trim().is_empty() {
            return Err(Error::InvalidArgument("Model name"));
        }

        let base_url = normalize_base_url(&base_url);
        info!(
            base_url = %base_url,
            model = %model,
            timeout = ?timeout,
            "Initialized API client"
        );

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
            model,
            timeout,
        })
    }

    /// The effective base URL, always ending in `/v1`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// POST `/chat/completions`.
    pub async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        options: GenerationOptions,
    ) -> Result<Response, Error> {
        debug!(
            message_count = messages.len(),
            max_tokens = ?options.max_tokens,
            temperature = ?options.temperature,
            stream = options.stream,
            "Sending chat completion request"
        );
        let body = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream: options.stream,
        };
        self.post("/chat/completions", &body).await
    }

    /// POST `/completions`.
    pub async fn create_completion(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<Response, Error> {
        debug!(
            prompt_length = prompt.len(),
            max_tokens = ?options.max_tokens,
            temperature = ?options.temperature,
            stream = options.stream,
            "Sending text completion request"
        );
        let body = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream: options.stream,
        };
        self.post("/completions", &body).await
    }

    /// POST `/embeddings`.
    pub async fn create_embeddings<I, S>(
        &self,
        input: I,
        dimensions: Option<u32>,
    ) -> Result<Response, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let body = EmbeddingRequest {
            model: self.model.clone(),
            input: input.into_iter().map(Into::into).collect(),
            dimensions,
        };
        debug!(
            input_count = body.input.len(),
            dimensions = ?dimensions,
            "Sending embedding request"
        );
        self.post("/embeddings", &body).await
    }

    #[instrument(skip(self, payload), fields(base_url = %self.base_url))]
    async fn post<P: Serialize>(&self, route: &str, payload: &P) -> Result<Response, Error> {
        let url = format!("{}{}", self.base_url, route);
        let body = serde_json::to_vec(payload).map_err(|e| Error::Transport(Box::new(e)))?;

        let request = Request::builder()
            .method("POST")
            .uri(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|e| Error::Transport(Box::new(e)))?;

        info!(url = %url, timeout = ?self.timeout, "POSTing inference request");

        let pending = self.http_client.request(request);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => pending.await,
        };
        result.map_err(Error::Transport)
    }
}

/// Strip trailing slashes and make sure the URL ends in `/v1` exactly once.
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with(API_VERSION_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_VERSION_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockHttpClient;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::collections::HashMap;

    fn mock_client(mock: &MockHttpClient) -> ApiClient<MockHttpClient> {
        ApiClient::with_client(mock.clone(), "http://x/", "secret", "m1", None).unwrap()
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://x/"), "http://x/v1");
        assert_eq!(normalize_base_url("http://x"), "http://x/v1");
        assert_eq!(normalize_base_url("http://x//"), "http://x/v1");
        assert_eq!(normalize_base_url("http://x/v1"), "http://x/v1");
        assert_eq!(normalize_base_url("http://x/v1/"), "http://x/v1");
        assert_eq!(
            normalize_base_url("https://demo.koyeb.app/tt"),
            "https://demo.koyeb.app/tt/v1"
        );
    }

    #[test]
    fn test_rejects_empty_configuration() {
        let mock = MockHttpClient::new(StatusCode::OK, "{}");

        let err = ApiClient::with_client(mock.clone(), "", "key", "m1", None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument("Base URL")));

        let err = ApiClient::with_client(mock.clone(), "  ", "key", "m1", None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument("Base URL")));

        let err = ApiClient::with_client(mock, "http://x", "key", "", None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument("Model name")));
    }

    #[test]
    fn test_effective_base_url() {
        let mock = MockHttpClient::new(StatusCode::OK, "{}");
        let client = mock_client(&mock);
        assert_eq!(client.base_url(), "http://x/v1");
        assert_eq!(client.model(), "m1");
        assert_eq!(client.timeout(), None);
    }

    #[tokio::test]
    async fn test_from_lookup_requires_base_url() {
        let err = ApiClient::from_lookup("m1", EnvironmentOptions::default(), |_| None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingEnvironment(ref name) if name == "KOYEB_TT_BASE_URL"));

        let err = ApiClient::from_lookup("m1", EnvironmentOptions::default(), |_| {
            Some(String::new())
        })
        .unwrap_err();
        assert!(matches!(err, Error::MissingEnvironment(_)));
    }

    #[tokio::test]
    async fn test_from_lookup_custom_variables() {
        let env: HashMap<&str, &str> = HashMap::from([("MY_BASE", "https://tt.example.com/")]);
        let options = EnvironmentOptions::builder()
            .base_url_env("MY_BASE".to_string())
            .api_key_env("MY_KEY".to_string())
            .timeout(Duration::from_secs(5))
            .build();

        let client = ApiClient::from_lookup("m1", options, |name| {
            env.get(name).map(|value| value.to_string())
        })
        .unwrap();

        assert_eq!(client.base_url(), "https://tt.example.com/v1");
        assert_eq!(client.api_key, "fake");
        assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_from_lookup_reads_api_key() {
        let client = ApiClient::from_lookup("m1", EnvironmentOptions::default(), |name| {
            match name {
                "KOYEB_TT_BASE_URL" => Some("http://localhost:8000".to_string()),
                "KOYEB_TT_API_KEY" => Some("jwt-token".to_string()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(client.api_key, "jwt-token");
        assert_eq!(client.base_url(), "http://localhost:8000/v1");
    }

    #[tokio::test]
    async fn test_chat_completion_request_shape() {
        let mock = MockHttpClient::new(StatusCode::OK, r#"{"id": "chatcmpl-local-stub"}"#);
        let client = mock_client(&mock);

        let response = client
            .create_chat_completion(
                &[
                    ChatMessage::system("Be brief."),
                    ChatMessage::user("Hello"),
                ],
                GenerationOptions::builder().max_tokens(64).temperature(0.5).build(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        assert_eq!(request.method, "POST");
        assert_eq!(request.uri, "http://x/v1/chat/completions");
        assert_eq!(header(&request.headers, "authorization"), Some("Bearer secret"));
        assert_eq!(header(&request.headers, "content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "m1",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hello"}
                ],
                "max_tokens": 64,
                "temperature": 0.5,
                "stream": false
            })
        );
    }

    #[tokio::test]
    async fn test_completion_omits_absent_options() {
        let mock = MockHttpClient::new(StatusCode::OK, "{}");
        let client = mock_client(&mock);

        client
            .create_completion(
                "Once upon a time",
                GenerationOptions::builder().stream(true).build(),
            )
            .await
            .unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests[0].uri, "http://x/v1/completions");
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "m1", "prompt": "Once upon a time", "stream": true})
        );
    }

    #[tokio::test]
    async fn test_embeddings_request_shape() {
        let mock = MockHttpClient::new(StatusCode::OK, "{}");
        let client = mock_client(&mock);

        client.create_embeddings(["a", "b"], Some(8)).await.unwrap();
        client.create_embeddings(vec!["c".to_string()], None).await.unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].uri, "http://x/v1/embeddings");

        let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            first,
            serde_json::json!({"model": "m1", "input": ["a", "b"], "dimensions": 8})
        );
        let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(second, serde_json::json!({"model": "m1", "input": ["c"]}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned_as_is() {
        let mock = MockHttpClient::new(StatusCode::UNAUTHORIZED, "denied");
        let client = mock_client(&mock);

        let response = client
            .create_completion("hi", GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"denied");
    }

    #[derive(Debug, Clone)]
    struct FailingClient;

    #[async_trait]
    impl HttpClient for FailingClient {
        async fn request(
            &self,
            _req: axum::extract::Request,
        ) -> Result<Response, crate::errors::BoxError> {
            Err("connection refused".into())
        }
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let client = ApiClient::with_client(FailingClient, "http://x", "k", "m1", None).unwrap();
        let err = client
            .create_completion("hi", GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[derive(Debug, Clone)]
    struct SlowClient(Duration);

    #[async_trait]
    impl HttpClient for SlowClient {
        async fn request(
            &self,
            _req: axum::extract::Request,
        ) -> Result<Response, crate::errors::BoxError> {
            tokio::time::sleep(self.0).await;
            Ok(Response::new(Body::empty()))
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let limit = Duration::from_millis(20);
        let client = ApiClient::with_client(
            SlowClient(Duration::from_secs(5)),
            "http://x",
            "k",
            "m1",
            Some(limit),
        )
        .unwrap();

        let err = client
            .create_embeddings(["a"], None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == limit));
    }

    #[tokio::test]
    async fn test_request_within_timeout_succeeds() {
        let client = ApiClient::with_client(
            SlowClient(Duration::from_millis(1)),
            "http://x",
            "k",
            "m1",
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        let response = client.create_embeddings(["a"], None).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
