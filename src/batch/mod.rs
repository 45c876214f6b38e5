//! 批量评测
//!
//! 数据集 -> 共享队列 -> 固定数量 worker；每题独立运行 Trial Controller，外层按题重试，
//! 结果逐题写入 records 文件，队列清空后写日志。

pub mod dataset;
pub mod pool;
pub mod retry;
pub mod runner;
pub mod sink;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub use dataset::{load_dataset, parse_dataset};
pub use pool::{PoolStats, WorkerPool};
pub use retry::{retry, RetryPolicy};
pub use runner::{FailedRecord, Outcome, QuestionRunner};
pub use sink::{BatchSummary, ResultSink};

use crate::agent::{QuestionTask, Strategy, TrialController};
use crate::config::AppConfig;
use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::retrieval::Docstore;

/// 未配置输出文件时的默认路径：output/<数据集名>_<策略>.json / .log
pub fn default_output_paths(dataset: &Path, strategy: Strategy) -> (PathBuf, PathBuf) {
    let stem = dataset
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let base = PathBuf::from("output").join(format!("{}_{}", stem, strategy.tag()));
    (base.with_extension("json"), base.with_extension("log"))
}

/// 用给定 runner 处理全部题目，结果写入 sink
pub async fn run_tasks(
    tasks: Vec<QuestionTask>,
    runner: Arc<QuestionRunner>,
    sink: Arc<ResultSink>,
    workers: usize,
    cancel: CancellationToken,
) -> Result<BatchSummary, AgentError> {
    let pool = WorkerPool::new(workers).with_cancel_token(cancel);
    let handler_sink = Arc::clone(&sink);
    let stats = pool
        .run(tasks, move |worker, index, task| {
            let runner = Arc::clone(&runner);
            let sink = Arc::clone(&handler_sink);
            async move {
                let outcome = runner.run(&task).await;
                if let Err(e) = sink.push(index, outcome).await {
                    tracing::warn!(index, error = %e, "failed to persist record");
                }
                tracing::info!(worker, question = index + 1, "question done");
            }
        })
        .await;
    if stats.abandoned > 0 {
        tracing::warn!(abandoned = stats.abandoned, "batch interrupted");
    }
    sink.finish().await
}

/// 按配置跑完整个数据集
pub async fn run_batch(
    config: &AppConfig,
    llm: Arc<dyn LlmClient>,
    judge: Arc<dyn LlmClient>,
    docstore: Arc<dyn Docstore>,
    cancel: CancellationToken,
) -> Result<BatchSummary, AgentError> {
    let batch = &config.batch;
    let strategy = config.agent.strategy;
    let tasks = load_dataset(&batch.dataset)?;

    let (default_records, default_log) = default_output_paths(&batch.dataset, strategy);
    let records_file = batch.records_file.clone().unwrap_or(default_records);
    let log_file = batch.log_file.clone().unwrap_or(default_log);

    let controller = TrialController::with_lookup(
        llm,
        judge,
        docstore,
        strategy,
        config.lookup.mode,
        config.lookup.options(),
    )
    .with_limits(config.agent.max_steps, config.agent.max_trials);
    let runner = Arc::new(QuestionRunner::new(
        controller,
        RetryPolicy::from_section(batch),
    ));
    let sink = Arc::new(ResultSink::new(Some(records_file.clone()), Some(log_file)));

    tracing::info!(
        strategy = %strategy,
        questions = tasks.len(),
        workers = batch.workers,
        records = %records_file.display(),
        "batch started"
    );
    run_tasks(tasks, runner, sink, batch.workers, cancel).await
}
