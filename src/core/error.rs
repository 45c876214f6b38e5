//! Agent 错误类型
//!
//! 只有 InvalidAction 会在 Trial Controller 内被捕获并转为补救提示；
//! 其余错误（LLM、配置、数据集）一律向外传播，由批处理层按题重试。
//! 检索失败不在此列：Action Dispatcher 把它转为哨兵观察。

use thiserror::Error;

/// 智能体运行过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM 输出不符合 `Name[argument]` 格式
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// 是否为可在 trial 内部恢复的格式错误（不消耗 trial）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AgentError::InvalidAction(_))
    }
}

impl From<config::ConfigError> for AgentError {
    fn from(e: config::ConfigError) -> Self {
        AgentError::ConfigError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_action_is_recoverable() {
        assert!(AgentError::InvalidAction("Foo".into()).is_recoverable());
        assert!(!AgentError::LlmError("timeout".into()).is_recoverable());
        assert!(!AgentError::Dataset("bad row".into()).is_recoverable());
    }
}
