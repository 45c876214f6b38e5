//! 策略选择
//!
//! 配置里的策略标签（如 `cot_gt_epm_reflexion`、`react_last_attempt`）在运行开始时解析一次为 [`RunPolicy`]，
//! 之后 Step Engine / Reflection Engine / Trial Controller 只读取其中的能力开关，不再按策略名分支。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chain-of-Thought 家族的六种策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CotStrategy {
    /// 无上下文，单次推理
    CotOnly,
    /// 提供支撑段落，单次推理
    CotGt,
    /// 无上下文，失败后生成反思再重试
    CotReflexion,
    /// 提供支撑段落，失败后累积错误记忆再重试
    CotGtEpm,
    /// 提供支撑段落，失败后生成反思再重试
    CotGtReflexion,
    /// 提供支撑段落，失败后反思并累积错误记忆
    CotGtEpmReflexion,
}

/// ReAct 家族的四种反思方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectionType {
    /// 失败后直接重试
    Base,
    /// 注入上一轮完整记录
    LastAttempt,
    /// 注入 LLM 生成的反思
    Reflexion,
    /// 两者都注入
    LastAttemptAndReflexion,
}

/// 策略标签：决定 agent 家族与失败后的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
    Cot(CotStrategy),
    React(ReflectionType),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::React(ReflectionType::LastAttemptAndReflexion)
    }
}

const TAGS: [(&str, Strategy); 10] = [
    ("cot_only", Strategy::Cot(CotStrategy::CotOnly)),
    ("cot_gt", Strategy::Cot(CotStrategy::CotGt)),
    ("cot_reflexion", Strategy::Cot(CotStrategy::CotReflexion)),
    ("cot_gt_epm", Strategy::Cot(CotStrategy::CotGtEpm)),
    ("cot_gt_reflexion", Strategy::Cot(CotStrategy::CotGtReflexion)),
    ("cot_gt_epm_reflexion", Strategy::Cot(CotStrategy::CotGtEpmReflexion)),
    ("react_base", Strategy::React(ReflectionType::Base)),
    ("react_last_attempt", Strategy::React(ReflectionType::LastAttempt)),
    ("react_reflexion", Strategy::React(ReflectionType::Reflexion)),
    (
        "react_last_attempt_and_reflexion",
        Strategy::React(ReflectionType::LastAttemptAndReflexion),
    ),
];

impl Strategy {
    /// 所有策略，按标签顺序
    pub fn all() -> impl Iterator<Item = Strategy> {
        TAGS.iter().map(|(_, s)| *s)
    }

    /// 配置文件中使用的 snake_case 标签
    pub fn tag(&self) -> &'static str {
        TAGS.iter()
            .find(|(_, s)| s == self)
            .map(|(tag, _)| *tag)
            .unwrap_or("unknown")
    }

    /// 解析为能力开关
    pub fn resolve(&self) -> RunPolicy {
        match *self {
            Strategy::Cot(cot) => {
                let (use_context, reflect, epm, single_shot) = match cot {
                    CotStrategy::CotOnly => (false, false, false, true),
                    CotStrategy::CotGt => (true, false, false, true),
                    CotStrategy::CotReflexion => (false, true, false, false),
                    CotStrategy::CotGtEpm => (true, false, true, false),
                    CotStrategy::CotGtReflexion => (true, true, false, false),
                    CotStrategy::CotGtEpmReflexion => (true, true, true, false),
                };
                RunPolicy {
                    agent: AgentKind::Cot,
                    use_context,
                    reflect_on_failure: reflect,
                    retain_error_memory: epm,
                    reflection: if reflect {
                        ReflectionMode::Critique
                    } else {
                        ReflectionMode::None
                    },
                    single_shot,
                }
            }
            Strategy::React(kind) => {
                let reflection = match kind {
                    ReflectionType::Base => ReflectionMode::None,
                    ReflectionType::LastAttempt => ReflectionMode::LastAttempt,
                    ReflectionType::Reflexion => ReflectionMode::Critique,
                    ReflectionType::LastAttemptAndReflexion => ReflectionMode::LastAttemptAndCritique,
                };
                RunPolicy {
                    agent: AgentKind::React,
                    use_context: false,
                    reflect_on_failure: reflection != ReflectionMode::None,
                    retain_error_memory: false,
                    reflection,
                    single_shot: false,
                }
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        TAGS.iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, s)| *s)
            .ok_or_else(|| {
                let known: Vec<&str> = TAGS.iter().map(|(t, _)| *t).collect();
                format!("unknown strategy '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

impl TryFrom<String> for Strategy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Strategy> for String {
    fn from(value: Strategy) -> Self {
        value.tag().to_string()
    }
}

/// agent 家族：决定提示模板与合法动作集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// Search / Lookup / Finish
    React,
    /// 只允许 Finish
    Cot,
}

/// 失败后注入下一轮的反思形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionMode {
    None,
    LastAttempt,
    Critique,
    LastAttemptAndCritique,
}

impl ReflectionMode {
    pub fn replays_last_attempt(&self) -> bool {
        matches!(self, Self::LastAttempt | Self::LastAttemptAndCritique)
    }

    pub fn generates_critique(&self) -> bool {
        matches!(self, Self::Critique | Self::LastAttemptAndCritique)
    }
}

/// 一次运行的能力开关，由 [`Strategy::resolve`] 得到
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    pub agent: AgentKind,
    /// 提示中渲染支撑段落；否则渲染 `<EMPTY>`
    pub use_context: bool,
    pub reflect_on_failure: bool,
    /// 跨 trial 累积失败记录并让 LLM 总结错误模式
    pub retain_error_memory: bool,
    pub reflection: ReflectionMode,
    /// 只跑一步，不进入 trial 循环
    pub single_shot: bool,
}

impl RunPolicy {
    /// 失败后是否需要调用 Reflection Engine
    pub fn reflects(&self) -> bool {
        self.reflect_on_failure || self.retain_error_memory
    }
}
