//! Docstore 契约与内存实现

use std::collections::HashMap;

use async_trait::async_trait;

use crate::retrieval::RetrievalError;

/// 知识库协作者：按实体名返回文档首段；未命中返回 NotFound，不会静默返回错误内容
#[async_trait]
pub trait Docstore: Send + Sync {
    async fn search(&self, entity: &str) -> Result<String, RetrievalError>;
}

/// 内存 Docstore：标题（大小写不敏感）到正文的映射，用于测试与离线评测
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocstore {
    pages: HashMap<String, String>,
}

impl InMemoryDocstore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, title: impl AsRef<str>, content: impl Into<String>) -> Self {
        self.insert(title, content);
        self
    }

    pub fn insert(&mut self, title: impl AsRef<str>, content: impl Into<String>) {
        self.pages
            .insert(title.as_ref().trim().to_lowercase(), content.into());
    }
}

#[async_trait]
impl Docstore for InMemoryDocstore {
    async fn search(&self, entity: &str) -> Result<String, RetrievalError> {
        let key = entity.trim().to_lowercase();
        if let Some(page) = self.pages.get(&key) {
            return Ok(page.clone());
        }
        let mut similar: Vec<String> = self
            .pages
            .keys()
            .filter(|title| {
                key.split_whitespace()
                    .any(|w| w.len() > 2 && title.contains(w))
            })
            .cloned()
            .collect();
        similar.sort();
        similar.truncate(5);
        Err(RetrievalError::NotFound {
            entity: entity.to_string(),
            similar,
        })
    }
}
