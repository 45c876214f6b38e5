//! Trial Controller：多轮 trial 的外层循环
//!
//! 每轮：(非首轮) 反思 -> 清空 scratchpad -> 反复 step 直到 Finish 或步数用尽 -> 记录回答。
//! 答对即停；失败则 trial_count + 1，直到 max_trials。单次 CoT 策略只跑一步。
//! step 返回 InvalidAction 时保留旧状态、步数 + 1，并把补救提示留给下一步，不消耗 trial。

use std::sync::Arc;

use crate::agent::dispatch::ActionDispatcher;
use crate::agent::policy::{RunPolicy, Strategy};
use crate::agent::record::ReflectRecord;
use crate::agent::reflection::ReflectionEngine;
use crate::agent::state::{AgentState, QuestionTask};
use crate::agent::step::StepEngine;
use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::retrieval::{Docstore, LookupMode, LookupOptions};

/// 格式错误后写入 scratchpad 的补救提示
pub const FORMAT_ERROR_NOTICE: &str = "<ERROR, PLEASE OUTPUT ACCORDING TO THE EXAMPLES>";

pub struct TrialController {
    strategy: Strategy,
    policy: RunPolicy,
    engine: StepEngine,
    reflector: ReflectionEngine,
    max_steps: usize,
    max_trials: usize,
}

impl TrialController {
    /// 三个协作者显式注入：推理 oracle、判题 oracle、知识库
    pub fn new(
        llm: Arc<dyn LlmClient>,
        judge: Arc<dyn LlmClient>,
        docstore: Arc<dyn Docstore>,
        strategy: Strategy,
    ) -> Self {
        Self::build(llm, judge, ActionDispatcher::new(docstore), strategy)
    }

    fn build(
        llm: Arc<dyn LlmClient>,
        judge: Arc<dyn LlmClient>,
        dispatcher: ActionDispatcher,
        strategy: Strategy,
    ) -> Self {
        let policy = strategy.resolve();
        Self {
            strategy,
            policy,
            engine: StepEngine::new(llm.clone(), judge, dispatcher, policy),
            reflector: ReflectionEngine::new(llm, policy),
            max_steps: 7,
            max_trials: 5,
        }
    }

    /// 带 Lookup 配置构建
    pub fn with_lookup(
        llm: Arc<dyn LlmClient>,
        judge: Arc<dyn LlmClient>,
        docstore: Arc<dyn Docstore>,
        strategy: Strategy,
        mode: LookupMode,
        options: LookupOptions,
    ) -> Self {
        let dispatcher = ActionDispatcher::new(docstore).with_lookup(mode, options);
        Self::build(llm, judge, dispatcher, strategy)
    }

    pub fn with_limits(mut self, max_steps: usize, max_trials: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self.max_trials = max_trials.max(1);
        self
    }

    /// 执行一步；格式错误在此转为补救提示，其余错误向外传播
    async fn advance(&self, state: AgentState) -> Result<AgentState, AgentError> {
        let result = self.engine.step(&state).await;
        match result {
            Ok(next) => Ok(next),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(step = state.step_count + 1, error = %e, "malformed action, retrying step");
                let mut state = state;
                state.step_count += 1;
                state.last_error = Some(FORMAT_ERROR_NOTICE.to_string());
                if state.step_count >= state.max_steps {
                    state.finished = true;
                }
                Ok(state)
            }
            Err(e) => Err(e),
        }
    }

    /// 回答一个问题，返回定稿的 ReflectRecord
    pub async fn run(&self, task: &QuestionTask) -> Result<ReflectRecord, AgentError> {
        let mut record = ReflectRecord::new(task, self.strategy);
        let mut state = AgentState::from_task(task).with_limits(self.max_steps, self.max_trials);
        tracing::info!(
            question_id = %record.id,
            strategy = %self.strategy,
            "question started"
        );

        if self.policy.single_shot {
            state = self.advance(state).await?;
            record.answers.push(state.answer.clone().unwrap_or_default());
            record.step_count = state.step_count;
        } else {
            while state.trial_count < state.max_trials {
                if state.trial_count > 0 {
                    if self.policy.reflects() {
                        self.reflector.reflect(&mut state).await?;
                    }
                    state.reset_trial();
                }
                tracing::info!(question_id = %record.id, trial = state.trial_count + 1, "trial started");

                while !state.is_trial_complete() {
                    state = self.advance(state).await?;
                }

                record.answers.push(state.answer.clone().unwrap_or_default());
                record.step_count += state.step_count;
                if state.is_correct == Some(true) {
                    break;
                }
                state.trial_count += 1;
            }
        }

        record.is_correct = state.is_correct;
        record.trial_count = state.trial_count;
        record.reflections = state.reflection_memory;
        record.scratchpad = state.scratchpad;
        tracing::info!(
            question_id = %record.id,
            correct = ?record.is_correct,
            trials = record.trial_count,
            steps = record.step_count,
            "question finished"
        );
        Ok(record)
    }
}
