//! 结果收集：每完成一题重写一次 records 文件（进度检查点），结束时写人类可读日志

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::batch::runner::Outcome;
use crate::core::AgentError;

/// 批处理汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub correct: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

#[derive(Default)]
struct SinkState {
    outcomes: Vec<Outcome>,
    logs: Vec<String>,
}

pub struct ResultSink {
    records_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    state: Mutex<SinkState>,
}

async fn write_file(path: &Path, contents: &str) -> Result<(), AgentError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

impl ResultSink {
    pub fn new(records_file: Option<PathBuf>, log_file: Option<PathBuf>) -> Self {
        Self {
            records_file,
            log_file,
            state: Mutex::new(SinkState::default()),
        }
    }

    /// 只在内存中收集
    pub fn in_memory() -> Self {
        Self::new(None, None)
    }

    /// 追加一题结果并重写 records 文件；index 为题目在数据集中的下标
    pub async fn push(&self, index: usize, outcome: Outcome) -> Result<(), AgentError> {
        let mut state = self.state.lock().await;
        state.logs.push(outcome.log_entry(index));
        state.outcomes.push(outcome);
        if let Some(path) = &self.records_file {
            let json =
                serde_json::to_string_pretty(&state.outcomes).map_err(std::io::Error::from)?;
            write_file(path, &json).await?;
        }
        Ok(())
    }

    pub async fn outcomes(&self) -> Vec<Outcome> {
        self.state.lock().await.outcomes.clone()
    }

    pub async fn summary(&self) -> BatchSummary {
        let state = self.state.lock().await;
        BatchSummary {
            total: state.outcomes.len(),
            correct: state.outcomes.iter().filter(|o| o.is_correct()).count(),
            failed: state.outcomes.iter().filter(|o| o.is_failed()).count(),
        }
    }

    /// 写日志文件并返回汇总
    pub async fn finish(&self) -> Result<BatchSummary, AgentError> {
        let summary = self.summary().await;
        if let Some(path) = &self.log_file {
            let state = self.state.lock().await;
            let mut text = format!(
                "Run finished at {}\nQuestions: {}, correct: {}, failed: {}\n\n",
                Local::now().to_rfc3339(),
                summary.total,
                summary.correct,
                summary.failed
            );
            text.push_str(&state.logs.join("\n"));
            write_file(path, &text).await?;
            tracing::info!(path = %path.display(), "log written");
        }
        Ok(summary)
    }
}
