//! 補完エンドポイントの抽象化と async-openai による実装

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use color_eyre::Result;
use thiserror::Error;
use tokio::runtime::Runtime;

use super::request::{PromptRequest, build_chat_request};

/// 1回の試行で起きた失敗
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{detail}")]
pub struct CompletionError {
    detail: String,
    retryable: bool,
}

impl CompletionError {
    /// 一時的な失敗（再試行に意味がある）
    pub fn transient(detail: impl Into<String>) -> Self {
        Self { detail: detail.into(), retryable: true }
    }

    /// 入力や認証の誤りなど、何度送っても結果が変わらない失敗
    pub fn permanent(detail: impl Into<String>) -> Self {
        Self { detail: detail.into(), retryable: false }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl From<OpenAIError> for CompletionError {
    fn from(err: OpenAIError) -> Self {
        let retryable = match &err {
            OpenAIError::InvalidArgument(_) => false,
            OpenAIError::ApiError(api) => {
                let invalid_request = api.r#type.as_deref() == Some("invalid_request_error");
                let bad_key = api.code.as_deref() == Some("invalid_api_key");
                !(invalid_request || bad_key)
            }
            _ => true,
        };
        Self { detail: err.to_string(), retryable }
    }
}

/// 補完エンドポイント。テストではスタブに差し替える。
pub trait ChatCompletion {
    /// プロンプトを送り、生成テキストを返す（ブロッキング）
    fn complete(&self, request: &PromptRequest) -> Result<String, CompletionError>;
}

/// async-openai のクライアントをブロッキングで使う実装
pub struct OpenAICompletion {
    client: Client<OpenAIConfig>,
    runtime: Runtime,
}

impl OpenAICompletion {
    pub fn new(api_key: &str) -> Result<Self> {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
        let runtime = Runtime::new()?;
        Ok(Self { client, runtime })
    }

    /// 1回だけ問い合わせる（リトライなし）
    pub async fn complete_async(&self, request: &PromptRequest) -> Result<String, CompletionError> {
        let req = build_chat_request(request)?;
        let resp = self.client.chat().create(req).await?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CompletionError::transient("response contained no message content"))
    }
}

impl ChatCompletion for OpenAICompletion {
    fn complete(&self, request: &PromptRequest) -> Result<String, CompletionError> {
        self.runtime.block_on(self.complete_async(request))
    }
}

impl<C: ChatCompletion + ?Sized> ChatCompletion for &C {
    fn complete(&self, request: &PromptRequest) -> Result<String, CompletionError> {
        (**self).complete(request)
    }
}

impl<C: ChatCompletion + ?Sized> ChatCompletion for Box<C> {
    fn complete(&self, request: &PromptRequest) -> Result<String, CompletionError> {
        (**self).complete(request)
    }
}
