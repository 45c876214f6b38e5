//! 按题重试：固定次数 + 指数退避
//!
//! 第 n 次失败后等待 clamp(multiplier * 2^(n-1) 秒, min, max)，最后一次失败不再等待。

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::BatchSection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// 总尝试次数（含第一次）
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    pub fn from_section(section: &BatchSection) -> Self {
        Self {
            max_attempts: section.retry_attempts.max(1),
            min_delay: Duration::from_millis(section.retry_min_delay_ms),
            max_delay: Duration::from_millis(section.retry_max_delay_ms),
            multiplier: section.retry_multiplier,
        }
    }

    /// 不等待的策略，测试用
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 0.0,
        }
    }

    /// 第 attempt 次（从 1 开始）失败后的等待时间
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = 2f64.powi(attempt.saturating_sub(1).min(30) as i32);
        let secs = (self.multiplier * exp).max(0.0);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay);
        delay.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }
}

/// 反复执行 op 直到成功或尝试次数用尽；返回最后一次错误
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts => {
                tracing::warn!(label, attempt, error = %e, "retries exhausted");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
