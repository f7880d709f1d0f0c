//! 入力のデバウンスと非同期結果の世代管理
//!
//! - `Debouncer`: 最後の呼び出しから一定時間後に1回だけ処理を実行する
//! - `Generation`: 新しい要求を出すたびに世代を進め、古い応答を捨てる

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 末尾実行のデバウンサ
///
/// `schedule` を呼ぶたびに待機中の処理を取り消し、待ち時間を最初からやり直す。
/// Tokio ランタイム上で使うこと。
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 処理を予約する（待機中の処理は取り消す）
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// 待機中の処理を取り消す
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// 待機中（または実行中）の処理があるか
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 要求の世代カウンタ
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい世代を発行する。これより前のチケットは古くなる
    pub fn issue(&self) -> Ticket {
        let id = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            id,
            counter: Arc::clone(&self.0),
        }
    }

    /// 発行中のチケットをすべて無効にする
    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// 要求1件分の世代
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    counter: Arc<AtomicU64>,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 最新の要求か
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.id
    }
}
