use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};

/// 1回の問い合わせ内容（プロンプト・モデル・temperature）
///
/// 永続化はせず、リトライを含む1回の呼び出しの間だけ存在する。
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// デバッグログ用の要約
    pub fn describe(&self) -> String {
        format!("Model: {}, Temperature: {}", self.model, self.temperature)
    }
}

/// ChatCompletionリクエストを構築する（userメッセージ1件のみ）
///
/// # Arguments
/// * `request` - プロンプト・モデル・temperature
///
/// # Returns
/// 構築されたChatCompletionリクエスト
pub fn build_chat_request(request: &PromptRequest) -> Result<CreateChatCompletionRequest, OpenAIError> {
    let user = ChatCompletionRequestUserMessageArgs::default()
        .content(request.prompt.as_str())
        .build()?;

    CreateChatCompletionRequestArgs::default()
        .model(&request.model)
        .messages([user.into()])
        .temperature(request.temperature)
        .build()
}
