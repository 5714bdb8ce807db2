//! 组件生命周期内的异步任务作用域
//!
//! 组件卸载时调用 `cancel`，尚未完成的请求被中止，已经返回的结果也会被丢弃，
//! 不会再写回已经销毁的页面状态。

use futures::future::{AbortHandle, abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct ScopeState {
    cancelled: bool,
    next_id: u64,
    pending: HashMap<u64, AbortHandle>,
}

#[derive(Clone, Default)]
pub struct TaskScope {
    state: Arc<Mutex<ScopeState>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScopeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 在作用域内运行一个 future
    ///
    /// 作用域被取消时返回 `None`，调用方据此放弃后续的状态更新。
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let (fut, handle) = abortable(fut);
        let id = {
            let mut state = self.lock();
            if state.cancelled {
                return None;
            }
            let id = state.next_id;
            state.next_id += 1;
            state.pending.insert(id, handle);
            id
        };

        let result = fut.await.ok();

        let mut state = self.lock();
        state.pending.remove(&id);
        if state.cancelled { None } else { result }
    }

    /// 中止所有未完成的任务，之后提交的任务也不会再执行
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled = true;
        for (_, handle) in state.pending.drain() {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }
}

impl std::fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("TaskScope")
            .field("cancelled", &state.cancelled)
            .field("pending", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    #[tokio::test]
    async fn completed_work_is_returned() {
        let scope = TaskScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test]
    async fn cancel_aborts_in_flight_work() {
        let scope = TaskScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let running = scope.clone();
        let task = tokio::spawn(async move { running.run(rx).await });
        tokio::task::yield_now().await;
        assert_eq!(scope.pending(), 1);

        scope.cancel();
        let _ = tx.send(1);
        assert_eq!(task.await.unwrap(), None);
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test]
    async fn nothing_runs_after_cancel() {
        let scope = TaskScope::new();
        scope.cancel();
        assert!(scope.is_cancelled());
        assert_eq!(scope.run(async { "late" }).await, None);
    }
}
