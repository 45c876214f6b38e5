//! ReflexQA 批量评测入口
//!
//! 用法：`reflexqa [config.toml]`。初始化日志、加载配置、构建 oracle 与 Wikipedia 检索，
//! 跑完数据集后输出准确率；Ctrl+C 中断时已完成的结果仍会写出。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use reflexqa::batch::run_batch;
use reflexqa::config::load_config;
use reflexqa::core::ShutdownManager;
use reflexqa::llm::create_llm_from_section;
use reflexqa::observability;
use reflexqa::retrieval::WikipediaDocstore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path).context("Failed to load config")?;

    let llm = create_llm_from_section(&config.llm);
    let judge = create_llm_from_section(&config.judge_section());
    let docstore = Arc::new(WikipediaDocstore::from_section(&config.retrieval));

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();
    let mut reasons = shutdown.subscribe();

    let summary = run_batch(&config, llm, judge, docstore, shutdown.token())
        .await
        .context("Batch run failed")?;

    tracing::info!(
        total = summary.total,
        correct = summary.correct,
        failed = summary.failed,
        accuracy = summary.accuracy(),
        "batch finished"
    );
    if shutdown.is_shutdown() {
        let reason = reasons.try_recv().ok();
        tracing::warn!(?reason, "batch stopped early, results cover completed questions only");
    }
    Ok(())
}
