//! Reflection Engine：失败 trial 之后生成注入下一轮提示的反思块
//!
//! - LastAttempt：截断后的上一轮记录，不调用 LLM
//! - Critique：LLM 根据问题与完整记录生成一行反思
//! - LastAttemptAndCritique：两者拼接，反思放在独立头部下
//! - 错误记忆（仅 CoT）：累积所有失败记录，让 LLM 总结错误模式；单独启用时注入总结，
//!   与 Critique 同时启用时注入反思 + 总结
//!
//! 反思只写入 reflection_summary / reflection_memory，不改动产生它的 scratchpad。

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::agent::policy::{AgentKind, RunPolicy};
use crate::agent::prompt::{
    cot_reflect_prompt, error_summary_prompt, format_error_summary, format_last_attempt,
    format_reflections, react_reflect_prompt, EMPTY_CONTEXT, REFLECTION_AFTER_LAST_TRIAL_HEADER,
    REFLECTION_HEADER, REFLECTION_HINT,
};
use crate::agent::scratchpad::format_step;
use crate::agent::state::AgentState;
use crate::core::AgentError;
use crate::llm::LlmClient;

fn reflection_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^reflection\s*\d*\s*:\s*").expect("valid label regex"))
}

/// 去掉 LLM 输出中开头的 `Reflection:` 标签
pub fn strip_reflection_label(text: &str) -> String {
    reflection_label().replace(text.trim(), "").trim().to_string()
}

pub struct ReflectionEngine {
    llm: Arc<dyn LlmClient>,
    policy: RunPolicy,
}

impl ReflectionEngine {
    pub fn new(llm: Arc<dyn LlmClient>, policy: RunPolicy) -> Self {
        Self { llm, policy }
    }

    async fn call(&self, prompt: &str) -> Result<String, AgentError> {
        self.llm.invoke(prompt).await.map_err(AgentError::LlmError)
    }

    /// 针对刚失败的 trial 更新反思；在清空 scratchpad 之前调用
    pub async fn reflect(&self, state: &mut AgentState) -> Result<(), AgentError> {
        let mode = self.policy.reflection;

        if self.policy.retain_error_memory {
            state.failed_attempts.push(state.scratchpad.clone());
            let prompt = error_summary_prompt(
                &state.question,
                &state.failed_attempts,
                &state.reference_key,
            );
            state.error_summary = self.call(&prompt).await?.trim().to_string();
            tracing::debug!(attempts = state.failed_attempts.len(), "error pattern summarized");
        }

        let mut summary = String::new();
        let mut entry = None;

        if mode.replays_last_attempt() {
            summary = format_last_attempt(&state.question, &state.scratchpad);
            entry = Some(state.scratchpad.clone());
        }

        if mode.generates_critique() {
            let critique = self.critique(state).await?;
            let header = if mode.replays_last_attempt() {
                summary.push('\n');
                REFLECTION_AFTER_LAST_TRIAL_HEADER
            } else {
                REFLECTION_HEADER
            };
            summary.push_str(&format_reflections(std::slice::from_ref(&critique), header));
            entry = Some(critique);
        }

        if self.policy.retain_error_memory {
            let block = format_error_summary(&state.error_summary);
            if summary.is_empty() {
                entry = Some(state.error_summary.clone());
            } else {
                summary.push('\n');
            }
            summary.push_str(&block);
        }

        if let Some(entry) = entry {
            state.reflection_memory.push(entry);
        }
        state.reflection_summary = summary;
        tracing::info!(
            trial = state.trial_count,
            reflections = state.reflection_memory.len(),
            "reflection produced"
        );
        Ok(())
    }

    async fn critique(&self, state: &AgentState) -> Result<String, AgentError> {
        let prompt = match self.policy.agent {
            AgentKind::React => react_reflect_prompt(&state.question, &state.scratchpad),
            AgentKind::Cot => {
                let context = if self.policy.use_context {
                    state.context.as_deref().unwrap_or(EMPTY_CONTEXT)
                } else {
                    EMPTY_CONTEXT
                };
                cot_reflect_prompt(context, &state.question, &state.scratchpad)
            }
        };
        let raw = self.call(&(prompt + REFLECTION_HINT)).await?;
        Ok(strip_reflection_label(&format_step(&raw)))
    }
}
