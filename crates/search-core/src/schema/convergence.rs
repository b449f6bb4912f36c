// search-core/src/schema/convergence.rs
//! 收敛轮询
//!
//! 字段定义变更后远程域需要重建索引。`apply_changes` 在需要时触发重建，
//! 然后以指数退避轮询状态直到不再处理中或超时。

use std::time::Duration;

use crate::client::DomainStatus;
use crate::error::Result;

use super::IndexSchema;

/// 单次观察到的远程域状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceState {
    NeedsReindex,
    Processing,
    UpToDate,
}

impl ConvergenceState {
    pub fn observe(status: &DomainStatus) -> Self {
        if status.processing {
            ConvergenceState::Processing
        } else if status.requires_index_documents {
            ConvergenceState::NeedsReindex
        } else {
            ConvergenceState::UpToDate
        }
    }
}

/// 退避下限，初始退避为零时避免空转
const MIN_BACKOFF: Duration = Duration::from_millis(1);

impl<R> IndexSchema<R> {
    /// 在 `timeout` 内让远程域收敛
    ///
    /// 返回最后一次观察到的状态是否已不在处理中。每次观察都强制刷新状态；
    /// 触发重建后会重新获取一次状态。超时为零时不等待。超时大到无法表示
    /// 截止时间时视为不限时。
    pub fn apply_changes(&self, timeout: Duration) -> Result<bool> {
        let deadline = self.clock.now().checked_add(timeout);

        let mut status = self.domain_status(true)?;
        if status.requires_index_documents {
            tracing::info!("[收敛] 域 {} 字段已变更，开始重建索引", self.name);
            self.reindex()?;
            status = self.domain_status(true)?;
        }
        let mut state = ConvergenceState::observe(&status);

        let mut backoff = self.initial_backoff.max(MIN_BACKOFF);
        while state == ConvergenceState::Processing {
            let pause = match deadline {
                Some(deadline) => {
                    let now = self.clock.now();
                    if now >= deadline {
                        break;
                    }
                    backoff.min(deadline - now)
                }
                None => backoff,
            };

            tracing::debug!("[收敛] 域 {} 处理中，等待 {:?}", self.name, pause);
            self.clock.sleep(pause);
            backoff = backoff.saturating_mul(2);

            state = ConvergenceState::observe(&self.domain_status(true)?);
        }

        let converged = state != ConvergenceState::Processing;
        if converged {
            tracing::info!("[收敛] 域 {} 已收敛", self.name);
        } else {
            tracing::warn!("[收敛] 域 {} 在 {:?} 内未收敛", self.name, timeout);
        }
        Ok(converged)
    }
}
