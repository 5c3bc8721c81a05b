//! アプリケーション設定と定数
//!
//! 起動時に一度だけ環境変数から読み込み、以後は変更しない。

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogSettings;
use crate::openai::RetryPolicy;

/// APIキーを保持する環境変数名（必須）
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// 既定モデルを上書きする環境変数名（任意）
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// 既定temperatureを上書きする環境変数名（任意）
pub const TEMPERATURE_VAR: &str = "OPENAI_TEMPERATURE";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(3);

/// アプリケーション設定
#[derive(Clone)]
pub struct Config {
    api_key: String,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
    logging: LogSettings,
}

impl Config {
    /// 指定したAPIキーと既定値で設定を作成
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryPolicy::new(MAX_RETRIES, RETRY_DELAY),
            logging: LogSettings::default(),
        }
    }

    /// プロセス環境変数から読み込む。APIキーが無ければ即エラー。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のルックアップ関数から読み込む（テストで環境変数を汚さないため）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let mut config = Self::with_api_key(api_key);

        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(raw) = lookup(TEMPERATURE_VAR) {
            config.temperature = parse_temperature(&raw)?;
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn logging(&self) -> &LogSettings {
        &self.logging
    }

    /// 既定モデルを差し替えた設定を返す
    pub fn model_named(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// リトライ方針を差し替えた設定を返す
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// ログ設定を差し替えた設定を返す
    pub fn log_settings(mut self, logging: LogSettings) -> Self {
        self.logging = logging;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &RedactedKey(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("retry", &self.retry)
            .field("logging", &self.logging)
            .finish()
    }
}

/// APIキーを先頭数文字だけ残して伏せる
struct RedactedKey<'a>(&'a str);

impl fmt::Debug for RedactedKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(3).collect();
        if self.0.chars().count() <= 6 {
            write!(f, "\"***\"")
        } else {
            write!(f, "\"{visible}***\"")
        }
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: TEMPERATURE_VAR,
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let value: f32 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(invalid("must be within 0.0..=2.0"));
    }
    Ok(value)
}
