//! prompt_kit
//!
//! OpenAI の ChatCompletion API に対する薄いオーケストレーション層。
//! タスク別のプロンプトを組み立て、固定回数リトライで送信し、
//! リクエスト/レスポンスを JSON 配列形式のローテーションログとコンソールへ記録する。

// 同階層のファイルをモジュールとしてインポート
pub mod config;
pub mod error;
pub mod logging;
pub mod openai;
pub mod prompts;

pub use config::Config;
pub use error::{ConfigError, PromptError};
pub use logging::{Level, LogFields, LogGuard, Logger};
pub use openai::{ChatCompletion, OpenAIClient, PromptRequest, RetryPolicy};
pub use prompts::PromptManager;

// Ensure .env is loaded for tests before anything else runs in the test process.
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}
