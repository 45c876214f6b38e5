//! Action 字符串解析：`Name[argument]`
//!
//! 缺少结尾 `]` 时自动补齐；不匹配 `^\w+\[.+\]` 视为格式错误（InvalidAction），由 Trial Controller 捕获。

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::AgentError;

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\[(.+)\]").expect("valid action regex"))
}

/// 解析后的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Lookup(String),
    Finish(String),
    /// 格式正确但名称未知
    Unknown { name: String, argument: String },
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Action::Search(_) => "Search",
            Action::Lookup(_) => "Lookup",
            Action::Finish(_) => "Finish",
            Action::Unknown { name, .. } => name,
        }
    }

    pub fn argument(&self) -> &str {
        match self {
            Action::Search(a) | Action::Lookup(a) | Action::Finish(a) => a,
            Action::Unknown { argument, .. } => argument,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name(), self.argument())
    }
}

/// 解析 LLM 输出的动作，返回 (名称, 参数) 对应的 [`Action`]
pub fn parse_action(raw: &str) -> Result<Action, AgentError> {
    let mut text = raw.trim().to_string();
    if !text.ends_with(']') {
        text.push(']');
    }
    let caps = action_regex()
        .captures(&text)
        .ok_or_else(|| AgentError::InvalidAction(raw.trim().to_string()))?;
    let name = caps[1].to_string();
    let argument = caps[2].to_string();
    Ok(match name.as_str() {
        "Search" => Action::Search(argument),
        "Lookup" => Action::Lookup(argument),
        "Finish" => Action::Finish(argument),
        _ => Action::Unknown { name, argument },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_actions() {
        assert_eq!(
            parse_action("Search[Rome Protocols]").unwrap(),
            Action::Search("Rome Protocols".into())
        );
        assert_eq!(
            parse_action("Lookup[death]").unwrap(),
            Action::Lookup("death".into())
        );
        assert_eq!(
            parse_action(" Finish[Joseph Henry, 1831]\n").unwrap(),
            Action::Finish("Joseph Henry, 1831".into())
        );
    }

    #[test]
    fn test_parse_appends_missing_bracket() {
        assert_eq!(
            parse_action("Finish[Paris").unwrap(),
            Action::Finish("Paris".into())
        );
    }

    #[test]
    fn test_parse_unknown_name() {
        let action = parse_action("Calculate[1+1]").unwrap();
        assert_eq!(
            action,
            Action::Unknown {
                name: "Calculate".into(),
                argument: "1+1".into()
            }
        );
        assert_eq!(action.to_string(), "Calculate[1+1]");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "Finish", "Finish[]", "I think the answer is Paris", "[Paris]"] {
            let err = parse_action(bad).unwrap_err();
            assert!(matches!(err, AgentError::InvalidAction(_)), "input {bad:?}");
        }
    }

    #[test]
    fn test_parse_keeps_first_line() {
        let action = parse_action("Search[Paris]\nObservation 1: Paris is a city.").unwrap();
        assert_eq!(action, Action::Search("Paris".into()));
    }
}
