//! 测试用 LLM 客户端（无需 API）
//!
//! - ScriptedLlmClient：按顺序弹出预设回复，并记录每次收到的 prompt，便于断言 prompt 内容
//! - FnLlmClient：由闭包根据 prompt 生成回复，无内部顺序，适合并发的批处理测试

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::stream;

use crate::llm::{LlmClient, Message, TokenStream};

/// 按顺序回放预设回复；队列耗尽时返回 Err，模拟传输失败
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlmClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 追加一次失败（下一次轮到它时返回 Err）
    pub fn push_error(&self, err: impl Into<String>) {
        lock(&self.responses).push_back(Err(err.into()));
    }

    pub fn push(&self, response: impl Into<String>) {
        lock(&self.responses).push_back(Ok(response.into()));
    }

    /// 迄今收到的全部 prompt（按调用顺序）
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn flatten(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        lock(&self.prompts).push(flatten(messages));
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err("scripted responses exhausted".to_string()))
    }

    async fn complete_stream(&self, messages: &[Message]) -> Result<TokenStream, String> {
        let content = self.complete(messages).await?;
        Ok(Box::pin(stream::iter(vec![Ok(content)])))
    }
}

type ResponderFn = dyn Fn(&str) -> Result<String, String> + Send + Sync;

/// 闭包驱动的客户端：回复只取决于 prompt 内容
pub struct FnLlmClient {
    responder: Box<ResponderFn>,
}

impl FnLlmClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
        }
    }
}

#[async_trait]
impl LlmClient for FnLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        (self.responder)(&flatten(messages))
    }

    async fn complete_stream(&self, messages: &[Message]) -> Result<TokenStream, String> {
        let content = self.complete(messages).await?;
        Ok(Box::pin(stream::iter(vec![Ok(content)])))
    }
}
