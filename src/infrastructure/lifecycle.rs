//! 控制器生命周期信号
//!
//! 每个控制器持有一个 `Lifecycle`，所有异步订阅都观察同一个信号；
//! 销毁后到达的响应一律丢弃，不再修改状态。

use tokio::sync::watch;

/// 生命周期所有者
#[derive(Debug)]
pub struct Lifecycle {
    tx: watch::Sender<bool>,
}

/// 生命周期观察者，可克隆后交给其他任务
#[derive(Debug, Clone)]
pub struct LifecycleToken {
    rx: watch::Receiver<bool>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> LifecycleToken {
        LifecycleToken {
            rx: self.tx.subscribe(),
        }
    }

    /// 发出销毁信号，重复调用无副作用
    pub fn destroy(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_destroyed(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleToken {
    pub fn is_destroyed(&self) -> bool {
        *self.rx.borrow()
    }

    /// 等待销毁信号；所有者被丢弃也视为销毁
    pub async fn destroyed(&mut self) {
        // wait_for 在发送端被丢弃时返回 Err
        let _ = self.rx.wait_for(|destroyed| *destroyed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_token_observes_destroy() {
        let lifecycle = Lifecycle::new();
        let mut token = lifecycle.token();
        assert!(!token.is_destroyed());

        let waiter = tokio::spawn(async move {
            token.destroyed().await;
            token.is_destroyed()
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        lifecycle.destroy();
        lifecycle.destroy();

        assert!(waiter.await.unwrap());
        assert!(lifecycle.is_destroyed());
    }

    #[tokio::test]
    async fn test_dropped_owner_releases_waiters() {
        let lifecycle = Lifecycle::new();
        let mut token = lifecycle.token();
        drop(lifecycle);
        tokio::time::timeout(Duration::from_secs(1), token.destroyed())
            .await
            .expect("发送端丢弃后应立即返回");
    }
}
