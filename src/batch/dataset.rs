//! HotpotQA 数据集加载
//!
//! 支持 JSON 数组或 JSON Lines。每行需要 `id`（或 `_id`）、`question`、`answer`；
//! 可选 `context` 与 `supporting_facts`（HF 列式或原始 `[title, ...]` 对列表），
//! 由此拼出支撑段落：每个支撑标题的句子直接连接，段落之间空一行。
//! 也可以直接给出 `supporting_paragraphs` 字符串。

use std::path::Path;

use serde::Deserialize;

use crate::agent::QuestionTask;
use crate::core::AgentError;

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "_id")]
    id: Option<String>,
    question: String,
    answer: String,
    context: Option<RawContext>,
    supporting_facts: Option<RawSupportingFacts>,
    supporting_paragraphs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawContext {
    /// HF datasets：{"title": [...], "sentences": [[...], ...]}
    Columns {
        title: Vec<String>,
        sentences: Vec<Vec<String>>,
    },
    /// 原始 HotpotQA：[[title, [sentences...]], ...]
    Pairs(Vec<(String, Vec<String>)>),
}

impl RawContext {
    fn sentences_of(&self, title: &str) -> Option<String> {
        match self {
            RawContext::Columns { title: titles, sentences } => titles
                .iter()
                .position(|t| t == title)
                .and_then(|i| sentences.get(i))
                .map(|s| s.concat()),
            RawContext::Pairs(pairs) => pairs
                .iter()
                .find(|(t, _)| t == title)
                .map(|(_, s)| s.concat()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSupportingFacts {
    Columns { title: Vec<String> },
    Pairs(Vec<(String, i64)>),
}

impl RawSupportingFacts {
    /// 支撑标题，去重并保持首次出现顺序
    fn titles(&self) -> Vec<&str> {
        let all: Vec<&str> = match self {
            RawSupportingFacts::Columns { title } => title.iter().map(String::as_str).collect(),
            RawSupportingFacts::Pairs(pairs) => pairs.iter().map(|(t, _)| t.as_str()).collect(),
        };
        let mut titles: Vec<&str> = Vec::new();
        for t in all {
            if !titles.contains(&t) {
                titles.push(t);
            }
        }
        titles
    }
}

impl RawRow {
    fn supporting_paragraphs(&self) -> Option<String> {
        if let Some(p) = &self.supporting_paragraphs {
            return Some(p.clone());
        }
        let context = self.context.as_ref()?;
        let facts = self.supporting_facts.as_ref()?;
        let paragraphs: Vec<String> = facts
            .titles()
            .into_iter()
            .filter_map(|t| context.sentences_of(t))
            .collect();
        if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join("\n\n"))
        }
    }

    fn into_task(self) -> QuestionTask {
        let context = self.supporting_paragraphs();
        QuestionTask {
            id: self.id,
            question: self.question,
            key: self.answer,
            context,
        }
    }
}

/// 从字符串解析数据集：以 `[` 开头按 JSON 数组解析，否则按 JSON Lines
pub fn parse_dataset(text: &str) -> Result<Vec<QuestionTask>, AgentError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let rows: Vec<RawRow> = serde_json::from_str(trimmed)
            .map_err(|e| AgentError::Dataset(format!("invalid JSON array: {}", e)))?;
        return Ok(rows.into_iter().map(RawRow::into_task).collect());
    }

    let mut tasks = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: RawRow = serde_json::from_str(line)
            .map_err(|e| AgentError::Dataset(format!("line {}: {}", i + 1, e)))?;
        tasks.push(row.into_task());
    }
    Ok(tasks)
}

/// 读取数据集文件
pub fn load_dataset(path: &Path) -> Result<Vec<QuestionTask>, AgentError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AgentError::Dataset(format!("{}: {}", path.display(), e)))?;
    let tasks = parse_dataset(&text)?;
    tracing::info!(path = %path.display(), questions = tasks.len(), "dataset loaded");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HF_ROW: &str = r#"{"id": "5a8b", "question": "Which film?", "answer": "The Prince & Me",
        "context": {"title": ["Kam Heskin", "The Prince & Me", "Other"],
                    "sentences": [["Kam Heskin is an actress.", " She played Paige Morgan."], ["The Prince & Me is a 2004 film."], ["Noise."]]},
        "supporting_facts": {"title": ["Kam Heskin", "Kam Heskin", "The Prince & Me"], "sent_id": [0, 1, 0]}}"#;

    #[test]
    fn test_hf_row_builds_supporting_paragraphs() {
        let text = HF_ROW.replace('\n', " ");
        let tasks = parse_dataset(&text).unwrap();
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.id.as_deref(), Some("5a8b"));
        assert_eq!(task.key, "The Prince & Me");
        assert_eq!(
            task.context.as_deref(),
            Some("Kam Heskin is an actress. She played Paige Morgan.\n\nThe Prince & Me is a 2004 film.")
        );
    }

    #[test]
    fn test_raw_hotpot_pairs_and_underscore_id() {
        let text = r#"[{"_id": "x1", "question": "Q?", "answer": "A",
            "context": [["T1", ["One.", " Two."]], ["T2", ["Three."]]],
            "supporting_facts": [["T2", 0]]}]"#;
        let tasks = parse_dataset(text).unwrap();
        assert_eq!(tasks[0].id.as_deref(), Some("x1"));
        assert_eq!(tasks[0].context.as_deref(), Some("Three."));
    }

    #[test]
    fn test_plain_rows_and_ready_paragraphs() {
        let text = "{\"question\": \"Q1?\", \"answer\": \"A1\"}\n\n{\"id\": \"2\", \"question\": \"Q2?\", \"answer\": \"A2\", \"supporting_paragraphs\": \"P\"}\n";
        let tasks = parse_dataset(text).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, None);
        assert_eq!(tasks[0].context, None);
        assert_eq!(tasks[1].context.as_deref(), Some("P"));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = parse_dataset("{\"question\": \"Q\", \"answer\": \"A\"}\nnot json\n").unwrap_err();
        assert!(matches!(err, AgentError::Dataset(ref m) if m.starts_with("line 2")));
    }

    #[test]
    fn test_load_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HF_ROW.replace('\n', " ")).unwrap();
        let tasks = load_dataset(file.path()).unwrap();
        assert_eq!(tasks[0].question, "Which film?");

        let missing = load_dataset(Path::new("/nonexistent/data.jsonl")).unwrap_err();
        assert!(matches!(missing, AgentError::Dataset(_)));
    }
}
