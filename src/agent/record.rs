//! ReflectRecord：一个问题的最终结果，Trial Controller 结束时定稿

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::policy::Strategy;
use crate::agent::state::QuestionTask;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectRecord {
    pub id: String,
    pub question: String,
    pub key: String,
    pub strategy: Strategy,
    /// 每轮 trial 的 Finish 回答；未 Finish 的轮次记空串
    pub answers: Vec<String>,
    /// 最后一轮的判定；最后一轮未 Finish 时为 None
    pub is_correct: Option<bool>,
    pub reflections: Vec<String>,
    /// 所有 trial 累计步数
    pub step_count: usize,
    /// 失败的 trial 数
    pub trial_count: usize,
    /// 最后一轮的 scratchpad
    pub scratchpad: String,
}

impl ReflectRecord {
    pub fn new(task: &QuestionTask, strategy: Strategy) -> Self {
        Self {
            id: task
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            question: task.question.clone(),
            key: task.key.clone(),
            strategy,
            answers: Vec::new(),
            is_correct: None,
            reflections: Vec::new(),
            step_count: 0,
            trial_count: 0,
            scratchpad: String::new(),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct == Some(true)
    }

    /// 人类可读的单题日志
    pub fn log_entry(&self, index: usize) -> String {
        format!(
            "Question {n}: {q}\nKey: {k}\nAnswers: {a:?}\nCorrect: {c:?}\nSteps: {s}\nTrials: {t}\nReflections: {r:?}\n",
            n = index + 1,
            q = self.question,
            k = self.key,
            a = self.answers,
            c = self.is_correct,
            s = self.step_count,
            t = self.trial_count,
            r = self.reflections,
        )
    }
}
