//! AgentState：单个问题在所有 trial 期间的状态
//!
//! 每个问题独占一份，不在问题之间或 worker 之间共享。

use crate::retrieval::LookupCursor;

/// 单步内的阶段：Thinking -> Acting -> Observing -> (Done | 下一步 Thinking)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPhase {
    #[default]
    Thinking,
    Acting,
    Observing,
    Done,
}

/// 待回答的问题
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionTask {
    /// 数据集中的 id；缺省时 ReflectRecord 生成 uuid
    pub id: Option<String>,
    pub question: String,
    /// 标准答案
    pub key: String,
    /// 支撑段落（仅 `*_gt*` 策略渲染进提示）
    pub context: Option<String>,
}

impl QuestionTask {
    pub fn new(question: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: None,
            question: question.into(),
            key: key.into(),
            context: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub question: String,
    pub reference_key: String,
    pub context: Option<String>,

    pub scratchpad: String,
    pub phase: StepPhase,
    pub step_count: usize,
    pub max_steps: usize,
    /// 已失败的 trial 数
    pub trial_count: usize,
    pub max_trials: usize,

    pub answer: Option<String>,
    pub is_correct: Option<bool>,
    pub finished: bool,

    /// 每次反思追加一条，跨 trial 保留
    pub reflection_memory: Vec<String>,
    /// 当前注入提示的反思块；每次反思后重算
    pub reflection_summary: String,
    /// 错误记忆：所有失败 trial 的 scratchpad
    pub failed_attempts: Vec<String>,
    /// 错误记忆的最新总结
    pub error_summary: String,

    /// 最近一次成功 Search 的文档；Lookup 基于它
    pub last_document: Option<String>,
    pub lookup_cursor: Option<LookupCursor>,
    /// 上一步的格式错误提示，下一步开始时写入 scratchpad
    pub last_error: Option<String>,
}

impl AgentState {
    pub fn new(question: impl Into<String>, reference_key: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            reference_key: reference_key.into(),
            context: None,
            scratchpad: String::new(),
            phase: StepPhase::Thinking,
            step_count: 0,
            max_steps: 7,
            trial_count: 0,
            max_trials: 5,
            answer: None,
            is_correct: None,
            finished: false,
            reflection_memory: Vec::new(),
            reflection_summary: String::new(),
            failed_attempts: Vec::new(),
            error_summary: String::new(),
            last_document: None,
            lookup_cursor: None,
            last_error: None,
        }
    }

    pub fn from_task(task: &QuestionTask) -> Self {
        let mut state = Self::new(task.question.clone(), task.key.clone());
        state.context = task.context.clone();
        state
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_limits(mut self, max_steps: usize, max_trials: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self.max_trials = max_trials.max(1);
        self
    }

    /// 当前 trial 是否结束：已 Finish 或步数用尽
    pub fn is_trial_complete(&self) -> bool {
        self.finished || self.step_count >= self.max_steps
    }

    /// 开始新 trial：清空记录与本轮结果，保留反思、错误记忆与待写入的错误提示
    pub fn reset_trial(&mut self) {
        self.scratchpad.clear();
        self.phase = StepPhase::Thinking;
        self.step_count = 0;
        self.answer = None;
        self.is_correct = None;
        self.finished = false;
        self.last_document = None;
        self.lookup_cursor = None;
    }
}
