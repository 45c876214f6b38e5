//! Answer Verifier：让判题 oracle 比较回答与标准答案
//!
//! 判定规则：响应转小写后包含 "true" 即视为正确。这是宽松的子串判断，
//! 判题输出里与结论无关的 "true" 也会被计为正确，属于已知近似。

use crate::core::AgentError;
use crate::llm::LlmClient;

/// 判题提示：判题方看不到原始上下文，只依据标准答案判断
pub fn judge_prompt(question: &str, answer: &str, key: &str) -> String {
    format!(
        "For the given question, judge whether the given answer is the same as the reference answer. \
The answer to some questions depends on a specific context that you do not have, so you should judge only against the given reference answer. \
You should return True or False.\nQuestion: {question}\nAnswer: {answer}\nReference answer: {key}"
    )
}

/// 把判题输出归约为布尔值
pub fn is_affirmative(judgement: &str) -> bool {
    judgement.to_lowercase().contains("true")
}

/// 调用判题 oracle；oracle 调用失败向上传播
pub async fn verify(
    question: &str,
    answer: &str,
    key: &str,
    oracle: &dyn LlmClient,
) -> Result<bool, AgentError> {
    let judgement = oracle
        .invoke(&judge_prompt(question, answer, key))
        .await
        .map_err(AgentError::LlmError)?;
    let verdict = is_affirmative(&judgement);
    tracing::debug!(answer, key, verdict, "verifier verdict");
    Ok(verdict)
}
