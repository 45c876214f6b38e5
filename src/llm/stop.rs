//! 停止词截断：流式读取底层 oracle 的输出，命中任一停止词即截断返回
//!
//! 对应 ReAct 常用的 `stop=["\n"]` 模式：Thought / Action 只取第一行。

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};

use crate::llm::{LlmClient, Message, TokenStream};

/// 包装任意 LlmClient，按停止词截断输出；停止词为空时透传
pub struct StopSequenceClient {
    inner: Arc<dyn LlmClient>,
    stop: Vec<String>,
}

impl StopSequenceClient {
    pub fn new(inner: Arc<dyn LlmClient>, stop: Vec<String>) -> Self {
        let stop = stop.into_iter().filter(|s| !s.is_empty()).collect();
        Self { inner, stop }
    }

    /// 返回 text 中最早出现的停止词位置
    fn first_stop(&self, text: &str) -> Option<usize> {
        self.stop.iter().filter_map(|s| text.find(s.as_str())).min()
    }
}

#[async_trait]
impl LlmClient for StopSequenceClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        if self.stop.is_empty() {
            return self.inner.complete(messages).await;
        }
        let mut tokens = self.inner.complete_stream(messages).await?;
        let mut content = String::new();
        while let Some(chunk) = tokens.next().await {
            content.push_str(&chunk?);
            if let Some(pos) = self.first_stop(&content) {
                content.truncate(pos);
                tracing::debug!(len = content.len(), "stop sequence hit");
                return Ok(content);
            }
        }
        Ok(content)
    }

    async fn complete_stream(&self, messages: &[Message]) -> Result<TokenStream, String> {
        let content = self.complete(messages).await?;
        Ok(Box::pin(stream::iter(vec![Ok(content)])))
    }
}
