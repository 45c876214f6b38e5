//! 固定大小的 worker 池
//!
//! 所有条目先放入共享 FIFO 队列（mpsc + Mutex 接收端），每个 worker 依次取出并处理到完成。
//! 每个条目最多被取出一次；取消时正在处理的条目被放弃，不再取新条目。

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// 池运行统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// 处理完成的条目数
    pub completed: usize,
    /// 因取消而放弃或未取出的条目数
    pub abandoned: usize,
}

pub struct WorkerPool {
    workers: usize,
    cancel: CancellationToken,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// 处理全部条目；handler 参数为 (worker 编号, 条目在输入中的下标, 条目)
    pub async fn run<T, F, Fut>(&self, items: Vec<T>, handler: F) -> PoolStats
    where
        T: Send + 'static,
        F: Fn(usize, usize, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let total = items.len();
        let (tx, rx) = mpsc::unbounded_channel();
        for item in items.into_iter().enumerate() {
            // 接收端在此之前不会关闭
            let _ = tx.send(item);
        }
        drop(tx);

        let rx = Arc::new(Mutex::new(rx));
        let handler = Arc::new(handler);
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..self.workers.min(total.max(1)))
            .map(|worker_id| {
                let rx = Arc::clone(&rx);
                let handler = Arc::clone(&handler);
                let completed = Arc::clone(&completed);
                let cancel = self.cancel.clone();
                tokio::spawn(async move {
                    loop {
                        let next = {
                            let mut rx = rx.lock().await;
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => None,
                                item = rx.recv() => item,
                            }
                        };
                        let Some((index, item)) = next else {
                            break;
                        };
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => {
                                tracing::warn!(worker = worker_id, index, "worker cancelled mid-item");
                                break;
                            }
                            _ = handler(worker_id, index, item) => {
                                completed.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                    tracing::debug!(worker = worker_id, "worker stopped");
                })
            })
            .collect();

        for result in join_all(handles).await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "worker task failed");
            }
        }

        let completed = completed.load(Ordering::Relaxed);
        PoolStats {
            completed,
            abandoned: total - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_each_item_processed_once() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let stats = WorkerPool::new(4)
            .run((0..50).collect(), move |_worker, index, item: u32| {
                let sink = Arc::clone(&sink);
                async move {
                    tokio::task::yield_now().await;
                    sink.lock().unwrap().push((index, item));
                }
            })
            .await;
        assert_eq!(stats, PoolStats { completed: 50, abandoned: 0 });
        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, (0..50).map(|i| (i as usize, i)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let stats = WorkerPool::new(3).run(Vec::<u32>::new(), |_, _, _| async {}).await;
        assert_eq!(stats, PoolStats::default());
    }

    #[tokio::test]
    async fn test_cancel_abandons_remaining() {
        let token = CancellationToken::new();
        let pool = WorkerPool::new(2).with_cancel_token(token.clone());
        let stats = pool
            .run((0..10).collect(), move |_, index, _item: u32| {
                let token = token.clone();
                async move {
                    if index == 1 {
                        token.cancel();
                    }
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
            })
            .await;
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.abandoned, 10);
    }
}
