//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `REFLEXQA__*` 覆盖（双下划线表示嵌套，如 `REFLEXQA__AGENT__STRATEGY=cot_gt`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::agent::Strategy;
use crate::core::AgentError;
use crate::retrieval::{LookupMode, LookupOptions};

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentSection,
    pub lookup: LookupSection,
    pub llm: LlmSection,
    /// 判题 oracle；未配置的键逐项沿用 [llm]
    pub judge: JudgeSection,
    pub retrieval: RetrievalSection,
    pub batch: BatchSection,
}

impl AppConfig {
    /// 判题端点：[judge] 中给出的键覆盖 [llm] 的同名键
    pub fn judge_section(&self) -> LlmSection {
        let judge = &self.judge;
        let llm = &self.llm;
        LlmSection {
            base_url: judge.base_url.clone().or_else(|| llm.base_url.clone()),
            model: judge.model.clone().unwrap_or_else(|| llm.model.clone()),
            api_key_env: judge
                .api_key_env
                .clone()
                .unwrap_or_else(|| llm.api_key_env.clone()),
            temperature: judge.temperature.or(llm.temperature),
            stop: judge.stop.clone().unwrap_or_else(|| llm.stop.clone()),
            timeout_secs: judge.timeout_secs.unwrap_or(llm.timeout_secs),
        }
    }
}

/// [agent] 段：策略与步数/轮数预算
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub strategy: Strategy,
    /// 每轮 trial 的最大步数
    pub max_steps: usize,
    /// 最大 trial 数
    pub max_trials: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_steps: 7,
            max_trials: 5,
        }
    }
}

/// [lookup] 段：Lookup 动作的匹配方式与窗口参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupSection {
    pub mode: LookupMode,
    pub score_threshold: u32,
    pub window_radius: usize,
    pub max_chars: usize,
}

impl Default for LookupSection {
    fn default() -> Self {
        let options = LookupOptions::default();
        Self {
            mode: LookupMode::default(),
            score_threshold: options.score_threshold,
            window_radius: options.window_radius,
            max_chars: options.max_chars,
        }
    }
}

impl LookupSection {
    pub fn options(&self) -> LookupOptions {
        LookupOptions {
            score_threshold: self.score_threshold,
            window_radius: self.window_radius,
            max_chars: self.max_chars,
        }
    }
}

/// [llm] / [judge] 段：OpenAI 兼容端点
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub base_url: Option<String>,
    pub model: String,
    /// 存放 API Key 的环境变量名
    pub api_key_env: String,
    pub temperature: Option<f32>,
    /// 停止词；为空表示不截断
    pub stop: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
            stop: Vec::new(),
            timeout_secs: 60,
        }
    }
}

/// [judge] 段：与 [llm] 同形，每个键都可省略
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct JudgeSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub stop: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

/// [retrieval] 段：Wikipedia 端点、超时与段落长度上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSection {
    pub wikipedia_base_url: String,
    pub timeout_secs: u64,
    pub max_chars: usize,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self {
            wikipedia_base_url: "https://en.wikipedia.org/w/api.php".to_string(),
            timeout_secs: 15,
            max_chars: 8000,
        }
    }
}

/// [batch] 段：数据集、输出文件、并发与重试
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub dataset: PathBuf,
    pub records_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub workers: usize,
    pub retry_attempts: u32,
    pub retry_min_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub retry_multiplier: f64,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/hotpot-qa-sample.jsonl"),
            records_file: None,
            log_file: None,
            workers: 10,
            retry_attempts: 3,
            retry_min_delay_ms: 1000,
            retry_max_delay_ms: 10_000,
            retry_multiplier: 1.0,
        }
    }
}

/// 从 config 目录加载配置，环境变量 REFLEXQA__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 REFLEXQA__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, AgentError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("REFLEXQA")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("llm.stop")
            .with_list_parse_key("judge.stop")
            .try_parsing(true),
    );

    Ok(builder.build()?.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{CotStrategy, ReflectionType};

    fn from_toml(text: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.agent.max_steps, 7);
        assert_eq!(cfg.agent.max_trials, 5);
        assert_eq!(cfg.lookup.score_threshold, 60);
        assert_eq!(cfg.lookup.window_radius, 2);
        assert_eq!(cfg.lookup.max_chars, 400);
        assert_eq!(cfg.batch.workers, 10);
        assert_eq!(cfg.batch.retry_attempts, 3);
        assert_eq!(cfg.judge_section().model, cfg.llm.model);
    }

    #[test]
    fn test_toml_sections() {
        let cfg = from_toml(
            r#"
            [agent]
            strategy = "cot_gt_epm_reflexion"
            max_steps = 3

            [lookup]
            mode = "keyword"

            [llm]
            model = "local-model"
            stop = ["\n"]

            [judge]
            model = "judge-model"
            "#,
        );
        assert_eq!(cfg.agent.strategy, Strategy::Cot(CotStrategy::CotGtEpmReflexion));
        assert_eq!(cfg.agent.max_steps, 3);
        assert_eq!(cfg.agent.max_trials, 5);
        assert_eq!(cfg.lookup.mode, LookupMode::Keyword);
        assert_eq!(cfg.llm.stop, vec!["\n".to_string()]);
        assert_eq!(cfg.judge_section().model, "judge-model");
    }

    #[test]
    fn test_partial_judge_inherits_llm_endpoint() {
        let cfg = from_toml(
            r#"
            [llm]
            base_url = "http://localhost:8000/v1"
            model = "local-model"
            api_key_env = "LOCAL_KEY"
            stop = ["\n"]
            timeout_secs = 30

            [judge]
            model = "judge-model"
            timeout_secs = 10
            "#,
        );
        let judge = cfg.judge_section();
        assert_eq!(judge.model, "judge-model");
        assert_eq!(judge.base_url.as_deref(), Some("http://localhost:8000/v1"));
        assert_eq!(judge.api_key_env, "LOCAL_KEY");
        assert_eq!(judge.stop, vec!["\n".to_string()]);
        assert_eq!(judge.timeout_secs, 10);
    }

    #[test]
    fn test_judge_overrides_endpoint() {
        let cfg = from_toml(
            r#"
            [llm]
            base_url = "http://localhost:8000/v1"
            api_key_env = "LOCAL_KEY"

            [judge]
            base_url = "https://judge.example/v1"
            api_key_env = "JUDGE_KEY"
            "#,
        );
        let judge = cfg.judge_section();
        assert_eq!(judge.base_url.as_deref(), Some("https://judge.example/v1"));
        assert_eq!(judge.api_key_env, "JUDGE_KEY");
        assert_eq!(judge.model, cfg.llm.model);
    }

    #[test]
    fn test_load_config_rejects_unknown_strategy() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"[agent]\nstrategy = \"react_magic\"\n").unwrap();
        let err = load_config(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, AgentError::ConfigError(_)));
    }

    #[test]
    fn test_react_strategy_tag() {
        let cfg = from_toml("[agent]\nstrategy = \"react_last_attempt_and_reflexion\"\n");
        assert_eq!(
            cfg.agent.strategy,
            Strategy::React(ReflectionType::LastAttemptAndReflexion)
        );
    }
}
