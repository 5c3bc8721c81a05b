//! リトライ付きリクエストラッパー

use std::time::Duration;

use color_eyre::Result;

use crate::config::Config;
use crate::error::PromptError;
use crate::logging::{LogFields, Logger};

use super::completion::{ChatCompletion, OpenAICompletion};
use super::request::PromptRequest;
use super::retry::{RetryPolicy, Sleeper, thread_sleeper};

/// 補完エンドポイントへの呼び出しを固定回数リトライで包むクライアント
pub struct OpenAIClient<C = OpenAICompletion> {
    completion: C,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
    sleeper: Sleeper,
    logger: Logger,
}

impl OpenAIClient<OpenAICompletion> {
    /// 設定のAPIキーで async-openai クライアントを作る
    pub fn from_config(config: &Config, logger: &Logger) -> Result<Self> {
        let completion = OpenAICompletion::new(config.api_key())?;
        Ok(Self::new(completion, config, logger))
    }
}

impl<C: ChatCompletion> OpenAIClient<C> {
    pub fn new(completion: C, config: &Config, logger: &Logger) -> Self {
        let logger = logger.for_module("openai_client");
        logger.info("OpenAI client initialized", LogFields::none());
        Self {
            completion,
            model: config.model().to_string(),
            temperature: config.temperature(),
            retry: *config.retry(),
            sleeper: thread_sleeper(),
            logger,
        }
    }

    /// リトライ間の待機処理を差し替える
    pub fn with_sleeper(mut self, sleeper: Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// 既定のモデルと temperature でリクエストを組み立てる
    pub fn request(&self, prompt: impl Into<String>) -> PromptRequest {
        PromptRequest::new(prompt, self.model.as_str(), self.temperature)
    }

    /// 既定のモデルと temperature で問い合わせる
    pub fn generate_response(&self, prompt: &str) -> Result<String, PromptError> {
        self.generate(&self.request(prompt))
    }

    /// 問い合わせを最大 `max_retries` 回試行する
    ///
    /// 成功した時点で即座に返す。失敗するたびに固定時間だけ待ち、
    /// 最後の試行でも失敗したら `PromptError::RetriesExhausted` を返す。
    pub fn generate(&self, request: &PromptRequest) -> Result<String, PromptError> {
        let attempts = self.retry.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.logger.debug(
                "Sending request to OpenAI API",
                LogFields::exchange(&request.prompt, request.describe()),
            );

            let err = match self.completion.complete(request) {
                Ok(text) => {
                    self.logger.info(
                        "Successfully received response from OpenAI API",
                        LogFields::exchange(&request.prompt, &text),
                    );
                    return Ok(text);
                }
                Err(err) => err,
            };

            self.logger.warning(
                format!("Attempt {attempt} failed"),
                LogFields::exchange(&request.prompt, err.detail()),
            );

            if !err.is_retryable() && !self.retry.retries_all_errors() {
                self.logger.error(
                    format!("Giving up after attempt {attempt}: error is not retryable"),
                    LogFields::exchange(&request.prompt, err.detail()),
                );
                return Err(PromptError::Rejected {
                    attempts: attempt,
                    error: err.detail().to_string(),
                });
            }

            if attempt >= attempts {
                self.logger.error(
                    format!("Failed after {attempts} attempts"),
                    LogFields::exchange(&request.prompt, err.detail()),
                );
                return Err(PromptError::RetriesExhausted {
                    attempts,
                    last_error: err.detail().to_string(),
                });
            }

            let delay = self.retry.delay();
            self.logger.info(
                format!("Waiting {} before retrying...", format_delay(delay)),
                LogFields::none(),
            );
            (self.sleeper)(delay);
        }
    }
}

fn format_delay(delay: Duration) -> String {
    if delay.subsec_nanos() == 0 {
        format!("{} seconds", delay.as_secs())
    } else {
        format!("{:.3} seconds", delay.as_secs_f64())
    }
}
