//! ライブラリ公開面のエラー型

use thiserror::Error;

/// 起動時の設定読み込みエラー。発生したら処理を継続しない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not found in environment variables")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// リクエストラッパーの最終結果（成功時は `Ok(String)`）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// 全リトライを使い切った
    #[error("Failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// 再試行しても無意味なエラーで打ち切った（`retry_all_errors(false)` の場合のみ）
    #[error("Request rejected on attempt {attempts}: {error}")]
    Rejected { attempts: u32, error: String },
}

impl PromptError {
    /// 実際に行った試行回数
    pub fn attempts(&self) -> u32 {
        match self {
            PromptError::RetriesExhausted { attempts, .. } => *attempts,
            PromptError::Rejected { attempts, .. } => *attempts,
        }
    }

    /// 最後に発生した下位エラーの詳細
    pub fn detail(&self) -> &str {
        match self {
            PromptError::RetriesExhausted { last_error, .. } => last_error,
            PromptError::Rejected { error, .. } => error,
        }
    }
}
