//! 检索层：知识库协作者契约与 Lookup 算法
//!
//! - Docstore：按实体名检索文档（Wikipedia / 内存实现）
//! - lookup：在上一次 Search 得到的文档内做模糊匹配或关键词匹配
//!
//! 检索未命中与传输失败都由 Action Dispatcher 转为哨兵观察，不会作为错误中断 trial。

pub mod docstore;
pub mod lookup;
pub mod wikipedia;

use serde::Deserialize;
use thiserror::Error;

pub use docstore::{Docstore, InMemoryDocstore};
pub use lookup::{fuzzy_lookup, keyword_lookup, partial_ratio, split_sentences, LookupCursor};
pub use wikipedia::WikipediaDocstore;

/// 检索失败的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    /// 页面不存在；similar 为候选标题
    #[error("Could not find [{entity}]. Similar: {similar:?}")]
    NotFound { entity: String, similar: Vec<String> },

    #[error("Retrieval transport failed: {0}")]
    Transport(String),
}

/// Lookup 动作的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// 句子级 partial-ratio 模糊匹配，返回最佳匹配句前后窗口
    #[default]
    Fuzzy,
    /// 逐条返回包含关键词的句子：(Result k / n)
    Keyword,
}

/// 模糊 Lookup 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// 最低匹配分（0-100）
    pub score_threshold: u32,
    /// 最佳匹配句前后各取几句
    pub window_radius: usize,
    /// 返回窗口的最大字符数
    pub max_chars: usize,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            score_threshold: 60,
            window_radius: 2,
            max_chars: 400,
        }
    }
}
