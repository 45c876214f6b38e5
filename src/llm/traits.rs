//! LLM 客户端抽象
//!
//! 推理 oracle 与判题 oracle 共用同一个 trait：complete（非流式）、complete_stream（流式 Token）。
//! 智能体只关心 `invoke(prompt) -> text`，即单条 user 消息的补全。

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::llm::Message;

/// 流式补全返回的 Token 流
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, String>> + Send>>;

/// LLM 客户端 trait：非流式完成与流式完成（返回 Token 流）
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, String>;

    /// 流式完成，返回 Token 流
    async fn complete_stream(&self, messages: &[Message]) -> Result<TokenStream, String>;

    /// 单 prompt 调用：prompt 作为唯一一条 user 消息
    async fn invoke(&self, prompt: &str) -> Result<String, String> {
        self.complete(&[Message::user(prompt)]).await
    }
}
