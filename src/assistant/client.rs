use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AssistantConfig;

/// 展示失败结果时使用的固定前缀
pub const ERROR_MARKER: &str = "Erreur lors de la requête";

/// 一次补全请求失败的原因，与模型的正常回答区分开
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("API 密钥未配置")]
    NotConfigured,

    #[error("发送请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API 返回错误 {status}: {body}")]
    Status { status: u16, body: String },

    #[error("解析 API 响应失败: {0}")]
    Decode(String),

    #[error("API 响应中没有内容")]
    EmptyResponse,
}

impl CompletionError {
    /// 界面上显示的错误文本
    pub fn sentinel(&self) -> String {
        format!("{}: {}", ERROR_MARKER, self)
    }
}

/// JSON 输出里失败结果序列化为错误文本
impl Serialize for CompletionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

pub type CompletionResult = Result<String, CompletionError>;

/// Chat Completions 请求体
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat Completions 响应体
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl CompletionClient {
    pub fn new(config: AssistantConfig) -> Result<Self, CompletionError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if !config.proxy.is_empty() {
            match reqwest::Proxy::all(&config.proxy) {
                Ok(proxy) => {
                    info!("使用代理: {}", config.proxy);
                    builder = builder.proxy(proxy);
                }
                Err(e) => {
                    warn!("代理配置无效 '{}': {}", config.proxy, e);
                }
            }
        }

        let client = builder.build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// 发送一次 system + user 对话，上下文拼在提示词前面
    pub async fn complete(&self, system: &str, prompt: &str, context: &str) -> CompletionResult {
        if !self.is_configured() {
            return Err(CompletionError::NotConfigured);
        }

        let user_content = format!("{}\n\n{}", context, prompt);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: &user_content,
                },
            ],
            temperature: self.config.temperature,
        };

        self.call_api(&request).await
    }

    /// 调用 API；max_retries 为 0 时只尝试一次
    async fn call_api(&self, request: &ChatRequest<'_>) -> CompletionResult {
        let attempts = self.config.max_retries + 1;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                info!("API 重试 ({}/{})，等待 {}ms...", attempt + 1, attempts, delay.as_millis());
                tokio::time::sleep(delay).await;
            }

            match self.do_request(request).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    warn!("API 调用失败 (尝试 {}/{}): {}", attempt + 1, attempts, e);
                    attempt += 1;
                    if attempt >= attempts {
                        return Err(e);
                    }
                }
            }
        }
    }

    async fn do_request(&self, request: &ChatRequest<'_>) -> CompletionResult {
        debug!("请求模型 {} ({} 条消息)", request.model, request.messages.len());

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_chat_response(&body)
    }
}

fn parse_chat_response(body: &str) -> CompletionResult {
    let chat_response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;

    chat_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_serializes_as_its_message() {
        let err = CompletionError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, serde_json::json!("API 返回错误 429: rate limited"));

        let ok: CompletionResult = Ok("bonjour".to_string());
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "Ok": "bonjour" })
        );
    }

    fn config_for(url: &str) -> AssistantConfig {
        AssistantConfig {
            api_url: url.to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..AssistantConfig::default()
        }
    }

    #[tokio::test]
    async fn refused_connection_becomes_transport_error() {
        // 端口 1 上没有服务，连接会被立即拒绝
        let client = CompletionClient::new(config_for("http://127.0.0.1:1/v1/chat/completions")).unwrap();

        let err = client.complete("system", "prompt", "").await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
        assert!(err.sentinel().starts_with(ERROR_MARKER));
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let config = AssistantConfig {
            api_key: String::new(),
            ..config_for("http://127.0.0.1:1/")
        };
        let client = CompletionClient::new(config).unwrap();

        assert!(!client.is_configured());
        let err = client.complete("system", "prompt", "ctx").await.unwrap_err();
        assert!(matches!(err, CompletionError::NotConfigured));
    }

    #[test]
    fn first_choice_content_is_returned() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Bonjour"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "Bonjour");
    }

    #[test]
    fn empty_choices_are_an_error() {
        let err = parse_chat_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));

        let err = parse_chat_response(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let err = parse_chat_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
        assert!(err.sentinel().contains(ERROR_MARKER));
    }

    #[test]
    fn request_serializes_roles_in_order() {
        let request = ChatRequest {
            model: "m",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: 0.3,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["model"], "m");
    }
}
