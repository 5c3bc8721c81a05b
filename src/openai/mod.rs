//! OpenAI連携のモジュール

pub mod client;
pub mod completion;
pub mod request;
pub mod retry;
pub mod stub;

// 代表的な公開APIを再エクスポート
pub use client::OpenAIClient;
pub use completion::{ChatCompletion, CompletionError, OpenAICompletion};
pub use request::{PromptRequest, build_chat_request};
pub use retry::{RetryPolicy, Sleeper, thread_sleeper};
pub use stub::StubCompletion;
