//! Step Engine：一次 step() 执行完整的 Think -> Act -> Observe
//!
//! step 接收旧状态、返回新状态，不修改输入；格式错误时返回 InvalidAction，
//! 由调用方决定保留旧状态并写入补救提示。

use std::sync::Arc;

use crate::agent::action::{parse_action, Action};
use crate::agent::dispatch::ActionDispatcher;
use crate::agent::policy::{AgentKind, RunPolicy};
use crate::agent::prompt::{cot_agent_prompt, react_agent_prompt, EMPTY_CONTEXT, THOUGHT_HINT};
use crate::agent::scratchpad::{append_entry, format_step, Section};
use crate::agent::state::{AgentState, StepPhase};
use crate::agent::verifier::verify;
use crate::core::AgentError;
use crate::llm::LlmClient;

pub const CORRECT_OBSERVATION: &str = "Answer is CORRECT.";
pub const INCORRECT_OBSERVATION: &str = "Answer is INCORRECT.";

pub struct StepEngine {
    llm: Arc<dyn LlmClient>,
    judge: Arc<dyn LlmClient>,
    dispatcher: ActionDispatcher,
    policy: RunPolicy,
}

impl StepEngine {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        judge: Arc<dyn LlmClient>,
        dispatcher: ActionDispatcher,
        policy: RunPolicy,
    ) -> Self {
        Self {
            llm,
            judge,
            dispatcher,
            policy,
        }
    }

    /// 按 agent 家族渲染完整提示：模板 + 示例 + (上下文) + 反思块 + 问题 + scratchpad
    pub fn render_prompt(&self, state: &AgentState) -> String {
        match self.policy.agent {
            AgentKind::React => {
                react_agent_prompt(&state.reflection_summary, &state.question, &state.scratchpad)
            }
            AgentKind::Cot => {
                let context = if self.policy.use_context {
                    state.context.as_deref().unwrap_or(EMPTY_CONTEXT)
                } else {
                    EMPTY_CONTEXT
                };
                cot_agent_prompt(
                    &state.reflection_summary,
                    context,
                    &state.question,
                    &state.scratchpad,
                )
            }
        }
    }

    async fn call(&self, prompt: &str) -> Result<String, AgentError> {
        self.llm.invoke(prompt).await.map_err(AgentError::LlmError)
    }

    /// 执行一步，返回新状态
    pub async fn step(&self, state: &AgentState) -> Result<AgentState, AgentError> {
        let mut next = state.clone();
        if let Some(err) = next.last_error.take() {
            next.scratchpad.push_str(&format!("\n{}\n", err));
        }
        next.step_count += 1;
        let n = next.step_count;

        // Think
        next.phase = StepPhase::Thinking;
        next.scratchpad.push_str(&Section::Thought.tag(n));
        let prompt = self.render_prompt(&next) + THOUGHT_HINT;
        let thought = self.call(&prompt).await?;
        next.scratchpad.push(' ');
        next.scratchpad.push_str(&format_step(&thought));

        // Act
        next.phase = StepPhase::Acting;
        next.scratchpad.push_str(&Section::Action.tag(n));
        let raw_action = self.call(&self.render_prompt(&next)).await?;
        next.scratchpad.push(' ');
        next.scratchpad.push_str(&raw_action);

        // Observe
        next.phase = StepPhase::Observing;
        let action = parse_action(&raw_action)?;
        let observation = self.observe(&action, &mut next).await?;
        append_entry(&mut next.scratchpad, Section::Observation, n, &observation);
        if next.step_count >= next.max_steps {
            next.finished = true;
        }

        next.phase = if next.is_trial_complete() {
            StepPhase::Done
        } else {
            StepPhase::Thinking
        };
        tracing::debug!(
            step = n,
            action = %action,
            finished = next.finished,
            "step completed"
        );
        Ok(next)
    }

    async fn observe(&self, action: &Action, state: &mut AgentState) -> Result<String, AgentError> {
        let result = self.dispatcher.dispatch(action, self.policy.agent, state).await;
        if !result.is_final {
            return Ok(result.observation);
        }
        let correct = verify(
            &state.question,
            &result.observation,
            &state.reference_key,
            self.judge.as_ref(),
        )
        .await?;
        state.is_correct = Some(correct);
        state.finished = true;
        Ok(if correct {
            CORRECT_OBSERVATION
        } else {
            INCORRECT_OBSERVATION
        }
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::policy::{CotStrategy, ReflectionType, Strategy};
    use crate::llm::ScriptedLlmClient;
    use crate::retrieval::InMemoryDocstore;

    fn engine(
        llm: Arc<ScriptedLlmClient>,
        judge: Arc<ScriptedLlmClient>,
        strategy: Strategy,
    ) -> StepEngine {
        let store = InMemoryDocstore::new().with_page("Paris", "Paris is the capital of France.");
        StepEngine::new(
            llm,
            judge,
            ActionDispatcher::new(Arc::new(store)),
            strategy.resolve(),
        )
    }

    #[tokio::test]
    async fn test_finish_step_is_verified() {
        let llm = Arc::new(ScriptedLlmClient::new(["The capital is Paris.", "Finish[Paris]"]));
        let judge = Arc::new(ScriptedLlmClient::new(["True, correct."]));
        let e = engine(llm.clone(), judge, Strategy::React(ReflectionType::Base));
        let state = AgentState::new("Capital of France?", "Paris");

        let next = e.step(&state).await.unwrap();

        assert_eq!(next.step_count, 1);
        assert!(next.finished);
        assert_eq!(next.is_correct, Some(true));
        assert_eq!(next.answer.as_deref(), Some("Paris"));
        assert_eq!(next.phase, StepPhase::Done);
        assert_eq!(
            next.scratchpad,
            "\nThought 1: The capital is Paris.\nAction 1: Finish[Paris]\nObservation 1: Answer is CORRECT."
        );
        // 输入状态不变
        assert_eq!(state.step_count, 0);
        assert!(state.scratchpad.is_empty());

        let prompts = llm.prompts();
        assert!(prompts[0].ends_with(&format!("Question: Capital of France?\nThought 1:{}", THOUGHT_HINT)));
        assert!(prompts[1].ends_with("\nThought 1: The capital is Paris.\nAction 1:"));
    }

    #[tokio::test]
    async fn test_search_step_caches_document() {
        let llm = Arc::new(ScriptedLlmClient::new(["Search it.", "Search[Paris]"]));
        let judge = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let e = engine(llm, judge.clone(), Strategy::React(ReflectionType::Base));
        let next = e.step(&AgentState::new("Q?", "A")).await.unwrap();
        assert!(!next.finished);
        assert_eq!(next.phase, StepPhase::Thinking);
        assert_eq!(next.last_document.as_deref(), Some("Paris is the capital of France."));
        assert!(next.scratchpad.ends_with("Observation 1: Paris is the capital of France."));
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_step_budget_sets_finished() {
        let llm = Arc::new(ScriptedLlmClient::new([
            "a", "Search[Atlantis]", "b", "Lookup[x]", "c", "Search[Atlantis]",
        ]));
        let judge = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let e = engine(llm, judge, Strategy::React(ReflectionType::Base));
        let mut state = AgentState::new("Q?", "A").with_limits(3, 1);
        for n in 1..=3 {
            assert!(!state.finished);
            state = e.step(&state).await.unwrap();
            assert_eq!(state.step_count, n);
        }
        assert!(state.finished);
        assert_eq!(state.is_correct, None);
        assert_eq!(state.phase, StepPhase::Done);
    }

    #[tokio::test]
    async fn test_malformed_action_leaves_input_untouched() {
        let llm = Arc::new(ScriptedLlmClient::new(["hmm", "I would answer Paris"]));
        let judge = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let e = engine(llm, judge, Strategy::React(ReflectionType::Base));
        let state = AgentState::new("Q?", "A");
        let err = e.step(&state).await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(state.step_count, 0);
    }

    #[tokio::test]
    async fn test_pending_error_is_written_first() {
        let llm = Arc::new(ScriptedLlmClient::new(["ok", "Finish[x]"]));
        let judge = Arc::new(ScriptedLlmClient::new(["False"]));
        let e = engine(llm, judge, Strategy::React(ReflectionType::Base));
        let mut state = AgentState::new("Q?", "A");
        state.step_count = 1;
        state.last_error = Some("<ERR>".into());
        let next = e.step(&state).await.unwrap();
        assert!(next.scratchpad.starts_with("\n<ERR>\n\nThought 2: ok"));
        assert_eq!(next.last_error, None);
        assert_eq!(next.is_correct, Some(false));
        assert!(next.scratchpad.ends_with(INCORRECT_OBSERVATION));
    }

    #[tokio::test]
    async fn test_cot_prompt_context_follows_policy() {
        let judge = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let state = AgentState::new("Q?", "A").with_context("Supporting paragraph.");

        let llm = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let with_ctx = engine(llm.clone(), judge.clone(), Strategy::Cot(CotStrategy::CotGt));
        assert!(with_ctx
            .render_prompt(&state)
            .contains("Relevant Context: Supporting paragraph."));

        let without = engine(llm, judge, Strategy::Cot(CotStrategy::CotOnly));
        assert!(without.render_prompt(&state).contains("Relevant Context: <EMPTY>"));
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let llm = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        llm.push_error("connection reset");
        let judge = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
        let e = engine(llm, judge, Strategy::React(ReflectionType::Base));
        let err = e.step(&AgentState::new("Q?", "A")).await.unwrap_err();
        assert!(matches!(err, AgentError::LlmError(ref m) if m == "connection reset"));
    }
}
