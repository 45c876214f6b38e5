//! 单题运行：Trial Controller 外包按题重试
//!
//! 重试从头重跑整道题；重试用尽时记录失败原因而不是中断批处理。

use serde::{Deserialize, Serialize};

use crate::agent::{QuestionTask, ReflectRecord, TrialController};
use crate::batch::retry::{retry, RetryPolicy};

/// 重试用尽的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRecord {
    pub id: Option<String>,
    pub question: String,
    pub error: String,
}

/// 单题结果：成功产出 ReflectRecord，或失败记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Record(ReflectRecord),
    Failed(FailedRecord),
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Record(r) if r.is_correct())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn log_entry(&self, index: usize) -> String {
        match self {
            Outcome::Record(r) => r.log_entry(index),
            Outcome::Failed(f) => format!(
                "Question {}: {}\nFailed: {}\n",
                index + 1,
                f.question,
                f.error
            ),
        }
    }
}

pub struct QuestionRunner {
    controller: TrialController,
    retry: RetryPolicy,
}

impl QuestionRunner {
    pub fn new(controller: TrialController, retry: RetryPolicy) -> Self {
        Self { controller, retry }
    }

    pub async fn run(&self, task: &QuestionTask) -> Outcome {
        let label = task.id.as_deref().unwrap_or(task.question.as_str());
        match retry(&self.retry, label, || self.controller.run(task)).await {
            Ok(record) => Outcome::Record(record),
            Err(e) => Outcome::Failed(FailedRecord {
                id: task.id.clone(),
                question: task.question.clone(),
                error: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::agent::{ReflectionType, Strategy};
    use crate::llm::ScriptedLlmClient;
    use crate::retrieval::InMemoryDocstore;

    fn runner(llm: Arc<ScriptedLlmClient>, judge: Arc<ScriptedLlmClient>, attempts: u32) -> QuestionRunner {
        let controller = TrialController::new(
            llm,
            judge,
            Arc::new(InMemoryDocstore::new()),
            Strategy::React(ReflectionType::Base),
        )
        .with_limits(2, 1);
        QuestionRunner::new(controller, RetryPolicy::immediate(attempts))
    }

    #[tokio::test]
    async fn test_retry_restarts_question() {
        let llm = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        llm.push_error("timeout");
        llm.push("Answer directly.");
        llm.push("Finish[Paris]");
        let judge = Arc::new(ScriptedLlmClient::new(["True"]));

        let outcome = runner(llm.clone(), judge, 3)
            .run(&QuestionTask::new("Capital of France?", "Paris").with_id("q1"))
            .await;

        assert!(outcome.is_correct());
        assert_eq!(llm.call_count(), 3);
        match outcome {
            Outcome::Record(r) => {
                assert_eq!(r.id, "q1");
                assert_eq!(r.answers, vec!["Paris".to_string()]);
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhausted_retries_record_failure() {
        let llm = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let judge = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let outcome = runner(llm.clone(), judge, 2)
            .run(&QuestionTask::new("Q?", "A").with_id("q9"))
            .await;
        assert!(outcome.is_failed());
        assert_eq!(llm.call_count(), 2);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["id"], "q9");
        assert_eq!(json["question"], "Q?");
        assert!(json["error"].as_str().unwrap().contains("scripted responses exhausted"));
        assert!(outcome.log_entry(0).contains("Failed: LLM error"));
    }
}
