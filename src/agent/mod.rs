//! 问答智能体
//!
//! - **action / dispatch**: `Name[argument]` 解析与执行
//! - **verifier**: 判题 oracle 归约为布尔值
//! - **scratchpad / state**: Thought / Action / Observation 记录与单题状态
//! - **step**: Think -> Act -> Observe 单步状态机
//! - **reflection**: 失败后的反思与错误记忆
//! - **trial**: 多轮 trial 控制
//! - **policy**: 策略标签到能力开关
//! - **record**: 单题结果

pub mod action;
pub mod dispatch;
pub mod fewshots;
pub mod policy;
pub mod prompt;
pub mod record;
pub mod reflection;
pub mod scratchpad;
pub mod state;
pub mod step;
pub mod trial;
pub mod verifier;

pub use action::{parse_action, Action};
pub use dispatch::{ActionDispatcher, Dispatch};
pub use policy::{AgentKind, CotStrategy, ReflectionMode, ReflectionType, RunPolicy, Strategy};
pub use record::ReflectRecord;
pub use reflection::ReflectionEngine;
pub use scratchpad::{truncate_scratchpad, Section};
pub use state::{AgentState, QuestionTask, StepPhase};
pub use step::StepEngine;
pub use trial::{TrialController, FORMAT_ERROR_NOTICE};
pub use verifier::verify;
