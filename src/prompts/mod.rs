//! タスク別プロンプトと PromptManager

pub mod manager;
pub mod templates;

pub use manager::{DEFAULT_IDEA_COUNT, PromptManager, RESUME_TEMPERATURE, SKILL_GAP_TEMPERATURE};
