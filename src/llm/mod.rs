//! LLM 层：oracle 抽象与实现（OpenAI 兼容 / 停止词截断 / 测试替身）

pub mod message;
pub mod mock;
pub mod openai;
pub mod stop;
pub mod traits;

use std::sync::Arc;

pub use message::{Message, Role};
pub use mock::{FnLlmClient, ScriptedLlmClient};
pub use openai::{OpenAiClient, TokenUsage};
pub use stop::StopSequenceClient;
pub use traits::{LlmClient, TokenStream};

use crate::config::LlmSection;

/// 按配置段构建 oracle：OpenAI 兼容客户端，配置了停止词时外包一层 StopSequenceClient
pub fn create_llm_from_section(section: &LlmSection) -> Arc<dyn LlmClient> {
    let client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::from_section(section));
    if section.stop.is_empty() {
        client
    } else {
        Arc::new(StopSequenceClient::new(client, section.stop.clone()))
    }
}
