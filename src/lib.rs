//! ReflexQA - ReAct / Chain-of-Thought 问答智能体与 Reflexion 多轮重试评测
//!
//! 模块划分：
//! - **agent**: Action 解析与执行、判题、Scratchpad、单步状态机、反思、Trial 控制、策略
//! - **batch**: 数据集加载、worker 池、按题重试、结果输出
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与中断处理
//! - **llm**: LLM oracle 抽象与实现（OpenAI 兼容 / 停止词截断 / 测试替身）
//! - **observability**: tracing 初始化
//! - **retrieval**: 知识库契约、Wikipedia 与内存实现、模糊 / 关键词 Lookup

pub mod agent;
pub mod batch;
pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod retrieval;

pub use agent::{QuestionTask, ReflectRecord, Strategy, TrialController};
pub use core::AgentError;
