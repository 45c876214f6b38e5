//! Wikipedia Docstore：MediaWiki API
//!
//! search(entity) 取精确标题（跟随重定向）的首段 extract，HTML 经 html2text 转为纯文本；
//! 页面不存在时用 opensearch 取最多 5 个相近标题，返回 NotFound。
//! 超过 max_chars 时截断。

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use html2text::from_read;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use crate::config::RetrievalSection;
use crate::retrieval::{Docstore, RetrievalError};

const USER_AGENT: &str = concat!("reflexqa/", env!("CARGO_PKG_VERSION"));
const SIMILAR_LIMIT: usize = 5;
const TEXT_WIDTH: usize = 10_000;

pub struct WikipediaDocstore {
    client: Client,
    base_url: String,
    max_chars: usize,
}

impl WikipediaDocstore {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, max_chars: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            max_chars,
        }
    }

    pub fn from_section(section: &RetrievalSection) -> Self {
        Self::new(
            section.wikipedia_base_url.clone(),
            section.timeout_secs,
            section.max_chars,
        )
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value, RetrievalError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .await
            .map_err(|e| RetrievalError::Transport(format!("Request failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(RetrievalError::Transport(format!("HTTP {}", resp.status())));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| RetrievalError::Transport(format!("Read body: {}", e)))
    }

    async fn similar_titles(&self, entity: &str) -> Vec<String> {
        let limit = SIMILAR_LIMIT.to_string();
        let params = [
            ("action", "opensearch"),
            ("format", "json"),
            ("search", entity),
            ("limit", limit.as_str()),
        ];
        match self.get_json(&params).await {
            Ok(body) => parse_opensearch(&body),
            Err(e) => {
                tracing::debug!(entity, error = %e, "opensearch failed");
                Vec::new()
            }
        }
    }

    fn clip(&self, text: String) -> String {
        match text.char_indices().nth(self.max_chars) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text,
        }
    }
}

/// 从 query 响应中取出第一页的 extract；页面缺失返回 None
fn parse_extract(body: &Value) -> Option<String> {
    let page = body.get("query")?.get("pages")?.as_array()?.first()?;
    if page.get("missing").is_some() || page.get("invalid").is_some() {
        return None;
    }
    let html = page.get("extract")?.as_str()?;
    if html.trim().is_empty() {
        return None;
    }
    Some(html.to_string())
}

/// opensearch 响应格式：[query, [titles], [descriptions], [urls]]
fn parse_opensearch(body: &Value) -> Vec<String> {
    body.get(1)
        .and_then(Value::as_array)
        .map(|titles| {
            titles
                .iter()
                .filter_map(Value::as_str)
                .take(SIMILAR_LIMIT)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn emphasis_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)</?(?:b|i|strong|em)(?:\s[^>]*)?>").expect("valid emphasis regex")
    })
}

/// html2text 给列表项加的 `* ` 前缀
fn strip_bullet(line: &str) -> &str {
    let line = line.trim_start();
    line.strip_prefix("* ").unwrap_or(line)
}

/// HTML extract 转纯文本，段落内换行合并为空格，段落间保留空行。
/// 强调标签在转换前去掉，正文里的星号原样保留。
fn extract_to_text(html: &str) -> String {
    let html = emphasis_tag_re().replace_all(html, "");
    let text = from_read(html.as_bytes(), TEXT_WIDTH).unwrap_or_else(|_| html.to_string());
    text.split("\n\n")
        .map(|p| {
            p.lines()
                .map(strip_bullet)
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Docstore for WikipediaDocstore {
    async fn search(&self, entity: &str) -> Result<String, RetrievalError> {
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("prop", "extracts"),
            ("exintro", "1"),
            ("redirects", "1"),
            ("titles", entity),
        ];
        let body = self.get_json(&params).await?;
        match parse_extract(&body) {
            Some(html) => {
                let text = extract_to_text(&html);
                tracing::debug!(entity, chars = text.chars().count(), "wikipedia page found");
                Ok(self.clip(text))
            }
            None => Err(RetrievalError::NotFound {
                entity: entity.to_string(),
                similar: self.similar_titles(entity).await,
            }),
        }
    }
}
