use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Pulling a model downloads gigabytes, so it gets its own timeout
const PULL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Ollama client for interacting with Ollama API
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generation options for the Ollama API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant, or tool)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// A message sent by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat request for the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    pub model: String,
    /// Messages of the conversation
    pub messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
    /// Output format: "json" or a JSON schema the answer must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Chat response from the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl ChatResponse {
    /// Build an assistant response carrying `content`
    pub fn assistant(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            created_at: String::new(),
            message: ChatMessage {
                role: "assistant".to_string(),
                content: content.into(),
            },
            done: true,
            prompt_eval_count: None,
            eval_count: None,
        }
    }
}

/// Locally available model, as listed by `/api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// Model name including its tag (e.g. "llama3.2:3b")
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

/// Builder methods for ChatRequest
impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: None,
            format: None,
            stream: Some(false),
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Constrain the answer to a JSON schema
    pub fn format(mut self, schema: Value) -> Self {
        self.format = Some(schema);
        self
    }

    /// Disable streaming
    pub fn no_stream(mut self) -> Self {
        self.stream = Some(false);
        self
    }

    /// Content of the last message, usually the prompt
    pub fn prompt(&self) -> &str {
        self.messages.last().map(|m| m.content.as_str()).unwrap_or_default()
    }
}

impl Ollama {
    /// Create a new Ollama client from an endpoint URL such as `http://localhost:11434`
    ///
    /// Uses connection pooling for better performance with concurrent requests.
    /// Note: Ollama typically uses HTTP/1.1, so we don't force HTTP/2.
    pub fn new_with_config(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Force HTTP/1.1 - Ollama uses HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat with the Ollama API
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send chat request to Ollama API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        // Get the raw response text first
        let response_text = response.text().await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text from Ollama API: {}", e)))?;

        parse_chat_response(&response_text)
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: Value = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        response["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }

    /// List the models available on the server
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let list: ModelList = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to list Ollama models: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama model list: {}", e)))?;
        Ok(list.models)
    }

    /// Download a model from the Ollama library
    pub async fn pull(&self, model: &str) -> Result<(), ProviderError> {
        let url = format!("{}/api/pull", self.base_url);
        let response = self.client.post(&url)
            .timeout(PULL_TIMEOUT)
            .json(&PullRequest { model, stream: false })
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to pull model {}: {}", model, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Make sure `model` is available locally, pulling it if needed
    ///
    /// Returns `true` when the model had to be pulled.
    pub async fn ensure_model(&self, model: &str) -> Result<bool, ProviderError> {
        let models = self.list_models().await?;
        if models.iter().any(|m| m.name.starts_with(model)) {
            debug!("Model {} is already available", model);
            return Ok(false);
        }

        info!("Pulling model {} from Ollama library...", model);
        self.pull(model).await?;
        Ok(true)
    }
}

/// Parse a chat answer, tolerating servers that stream JSON lines despite `stream: false`
fn parse_chat_response(response_text: &str) -> Result<ChatResponse, ProviderError> {
    match serde_json::from_str::<ChatResponse>(response_text) {
        Ok(chat_response) => Ok(chat_response),
        Err(e) => {
            let lines: Vec<&str> = response_text.lines().filter(|l| !l.trim().is_empty()).collect();
            let chunks: Vec<ChatResponse> = lines.iter()
                .filter_map(|line| serde_json::from_str::<ChatResponse>(line).ok())
                .collect();

            if chunks.is_empty() || chunks.len() != lines.len() {
                // Log the raw response for debugging
                error!("Failed to parse Ollama API chat response: {}. Raw response (first 500 chars): {}",
                      e, response_text.chars().take(500).collect::<String>());
                return Err(ProviderError::ParseError(format!("Failed to parse Ollama API chat response: {}", e)));
            }

            // For streaming responses, we need to concatenate all the message content pieces
            let content: String = chunks.iter().map(|c| c.message.content.as_str()).collect();
            let last = &chunks[chunks.len() - 1];
            Ok(ChatResponse {
                model: last.model.clone(),
                created_at: last.created_at.clone(),
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content,
                },
                done: true,
                prompt_eval_count: last.prompt_eval_count,
                eval_count: last.eval_count,
            })
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.chat(request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {}", version);
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.message.content.clone()
    }
}
