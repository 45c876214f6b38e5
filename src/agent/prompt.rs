//! 提示模板与渲染
//!
//! 模板占位符直接由 `format!` 填充；反思块、上下文、scratchpad 都是不透明文本。

use crate::agent::fewshots::{COT, COT_REFLECT, REFLECTIONS, WEBTHINK_SIMPLE3};
use crate::agent::scratchpad::{truncate_scratchpad, DEFAULT_TRUNCATE_LEN};

/// 无上下文时渲染的占位
pub const EMPTY_CONTEXT: &str = "<EMPTY>";

/// Think 调用追加的单行提示
pub const THOUGHT_HINT: &str = "\n(Note: Write down your thoughts in one line without Thought prefix.)";
/// 反思调用追加的单行提示
pub const REFLECTION_HINT: &str =
    "\n(Note: Write down your reflection in one line without Reflection prefix.)";

pub const LAST_TRIAL_HEADER: &str = "You have attempted to answer the following question before and failed. Below is the last trial you attempted to answer the question.\n";
pub const REFLECTION_HEADER: &str = "You have attempted to answer following question before and failed. The following reflection(s) give a plan to avoid failing to answer the question in the same way you did previously. Use them to improve your strategy of correctly answering the given question.\n";
pub const REFLECTION_AFTER_LAST_TRIAL_HEADER: &str = "The following reflection(s) give a plan to avoid failing to answer the question in the same way you did previously. Use them to improve your strategy of correctly answering the given question.\n";
pub const ERROR_SUMMARY_HEADER: &str = "Summary of the mistakes made in previous attempts:\n";

/// ReAct agent 提示
pub fn react_agent_prompt(reflections: &str, question: &str, scratchpad: &str) -> String {
    format!(
        "Solve a question answering task with interleaving Thought, Action, Observation steps. Thought can reason about the current situation, and Action can be three types:
(1) Search[entity], which searches the exact entity on Wikipedia and returns the first paragraph if it exists. If not, it will return some similar entities to search.
(2) Lookup[keyword], which returns the next sentence containing keyword in the last passage successfully found by Search.
(3) Finish[answer], which returns the answer and finishes the task.
You may take as many steps as necessary.
Here are some examples:
{WEBTHINK_SIMPLE3}
(END OF EXAMPLES)
{reflections}
Question: {question}{scratchpad}"
    )
}

/// CoT agent 提示
pub fn cot_agent_prompt(reflections: &str, context: &str, question: &str, scratchpad: &str) -> String {
    format!(
        "Solve a question answering task by having a Thought, then Finish with your answer. Thought can reason about the current situation. Finish[answer] returns the answer and finishes the task. You will be given context that you should use to help you answer the question.
Here are some examples:
{COT}
(END OF EXAMPLES)
{reflections}
Relevant Context: {context}
Question: {question}{scratchpad}"
    )
}

/// ReAct 反思提示：上一轮完整（未截断）记录
pub fn react_reflect_prompt(question: &str, scratchpad: &str) -> String {
    format!(
        "You are an advanced reasoning agent that can improve based on self refection. You will be given a previous reasoning trial in which you were given access to an Docstore API environment and a question to answer. You were unsuccessful in answering the question either because you guessed the wrong answer with Finish[<answer>], or you used up your set number of reasoning steps. In a few sentences, Diagnose a possible reason for failure and devise a new, concise, high level plan that aims to mitigate the same failure. Use complete sentences.
Here are some examples:
{REFLECTIONS}

Previous trial:
Question: {question}{scratchpad}

Reflection:"
    )
}

/// CoT 反思提示
pub fn cot_reflect_prompt(context: &str, question: &str, scratchpad: &str) -> String {
    format!(
        "You are an advanced reasoning agent that can improve based on self refection. You will be given a previous reasoning trial in which you were given access to relevant context and a question to answer. You were unsuccessful in answering the question either because you guessed the wrong answer with Finish[<answer>] or there is a phrasing discrepancy with your provided answer and the answer key. In a few sentences, Diagnose a possible reason for failure or phrasing discrepancy and devise a new, concise, high level plan that aims to mitigate the same failure. Use complete sentences.
Here are some examples:
{COT_REFLECT}
(END OF EXAMPLES)
Previous trial:
Relevant Context: {context}
Question: {question}{scratchpad}

Reflection:"
    )
}

/// 错误记忆总结提示：包含全部失败记录与标准答案
pub fn error_summary_prompt(question: &str, attempts: &[String], key: &str) -> String {
    let attempts = attempts
        .iter()
        .enumerate()
        .map(|(i, a)| format!("Attempt {}:{}", i + 1, a))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Analyze the error patterns in the following attempts to solve a question.
Question: {question}
{attempts}
Correct answer: {key}
Summarize the key points of the mistakes so they are not repeated."
    )
}

/// 上一轮记录：截断后的 scratchpad 放在固定头部之下
pub fn format_last_attempt(question: &str, scratchpad: &str) -> String {
    let pad = truncate_scratchpad(scratchpad, DEFAULT_TRUNCATE_LEN);
    format!(
        "{}\nQuestion: {}\n{}\n(END PREVIOUS TRIAL)\n",
        LAST_TRIAL_HEADER,
        question,
        pad.trim()
    )
}

/// 反思列表：头部 + `Reflections:` + 每条一行
pub fn format_reflections(reflections: &[String], header: &str) -> String {
    if reflections.is_empty() {
        return String::new();
    }
    let items: Vec<&str> = reflections.iter().map(|r| r.trim()).collect();
    format!("{}Reflections:\n- {}", header, items.join("\n- "))
}

/// 错误记忆块
pub fn format_error_summary(summary: &str) -> String {
    if summary.trim().is_empty() {
        return String::new();
    }
    format!("{}{}", ERROR_SUMMARY_HEADER, summary.trim())
}
