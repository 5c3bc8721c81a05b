//! PromptManager
//!
//! タスク別のプロンプトを組み立て、リトライ付きクライアントへ委譲する利用者向けの窓口。
//! 各操作の前後で入力と応答をログに残す。応答の形式は検証しない。

use color_eyre::Result;

use crate::config::Config;
use crate::error::PromptError;
use crate::logging::{LogFields, Logger};
use crate::openai::{ChatCompletion, OpenAIClient, OpenAICompletion};

use super::templates;

/// `generate_ideas` の既定アイデア数
pub const DEFAULT_IDEA_COUNT: usize = 5;
/// スキル抽出時の temperature（出力を安定させるため低め）
pub const RESUME_TEMPERATURE: f32 = 0.3;
/// スキルギャップ分析時の temperature
pub const SKILL_GAP_TEMPERATURE: f32 = 0.2;

pub struct PromptManager<C = OpenAICompletion> {
    client: OpenAIClient<C>,
    logger: Logger,
}

impl PromptManager<OpenAICompletion> {
    /// 本番用の構成（async-openai クライアント）で作成
    pub fn from_config(config: &Config, logger: &Logger) -> Result<Self> {
        let client = OpenAIClient::from_config(config, logger)?;
        Ok(Self::new(client, logger))
    }
}

impl<C: ChatCompletion> PromptManager<C> {
    pub fn new(client: OpenAIClient<C>, logger: &Logger) -> Self {
        let logger = logger.for_module("prompt_manager");
        logger.info("PromptManager initialized", LogFields::none());
        Self { client, logger }
    }

    pub fn client(&self) -> &OpenAIClient<C> {
        &self.client
    }

    /// テキストを要約する
    pub fn summarize_text(&self, text: &str) -> Result<String, PromptError> {
        self.logger.info("Generating text summary", LogFields::prompt(text));
        let response = self.client.generate_response(&templates::summarize(text))?;
        self.logger.info("Generated summary", LogFields::exchange(text, &response));
        Ok(response)
    }

    /// テキストの感情分析
    pub fn analyze_sentiment(&self, text: &str) -> Result<String, PromptError> {
        self.logger.info("Analyzing sentiment", LogFields::prompt(text));
        let response = self.client.generate_response(&templates::sentiment(text))?;
        self.logger.info("Sentiment analysis complete", LogFields::exchange(text, &response));
        Ok(response)
    }

    /// トピックについて `num_ideas` 個のアイデアを出す
    pub fn generate_ideas(&self, topic: &str, num_ideas: usize) -> Result<String, PromptError> {
        self.logger.info(format!("Generating {num_ideas} ideas"), LogFields::prompt(topic));
        let response = self.client.generate_response(&templates::ideas(topic, num_ideas))?;
        self.logger.info("Ideas generated", LogFields::exchange(topic, &response));
        Ok(response)
    }

    /// 質問をそのまま送る
    pub fn answer_question(&self, question: &str) -> Result<String, PromptError> {
        self.logger.info("Processing question", LogFields::prompt(question));
        let response = self.client.generate_response(question)?;
        self.logger.info("Answer generated", LogFields::exchange(question, &response));
        Ok(response)
    }

    /// 履歴書の一節から技術・職能・ソフトスキルを抽出する
    pub fn analyze_resume_point(&self, resume_text: &str) -> Result<String, PromptError> {
        self.logger.info(
            "Analyzing resume text for skills extraction",
            LogFields::prompt(resume_text),
        );

        let request = self
            .client
            .request(templates::resume_skills(resume_text))
            .with_temperature(RESUME_TEMPERATURE);

        match self.client.generate(&request) {
            Ok(response) => {
                self.logger.info(
                    "Successfully extracted skills from resume text",
                    LogFields::exchange(resume_text, &response),
                );
                Ok(response)
            }
            Err(e) => {
                self.logger.error(
                    "Failed to analyze resume text",
                    LogFields::exchange(resume_text, e.to_string()),
                );
                Err(e)
            }
        }
    }

    /// 履歴書と求人票のスキルギャップを分析する
    pub fn analyze_skill_gap(&self, resume_text: &str, job_description: &str) -> Result<String, PromptError> {
        let log_input = templates::skill_gap_log_input(resume_text, job_description);
        self.logger.info(
            "Analyzing skill gap between resume and job description",
            LogFields::prompt(&log_input),
        );

        let request = self
            .client
            .request(templates::skill_gap(resume_text, job_description))
            .with_temperature(SKILL_GAP_TEMPERATURE);

        match self.client.generate(&request) {
            Ok(response) => {
                self.logger.info(
                    "Successfully completed skill gap analysis",
                    LogFields::exchange(&log_input, &response),
                );
                Ok(response)
            }
            Err(e) => {
                self.logger.error(
                    "Failed to complete skill gap analysis",
                    LogFields::exchange(&log_input, e.to_string()),
                );
                Err(e)
            }
        }
    }
}
