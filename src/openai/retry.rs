//! リトライ方針（固定回数・固定間隔）

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// 待機処理。テストでは実際に眠らない関数に差し替える。
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// 既定の待機処理（スレッドを止める）
pub fn thread_sleeper() -> Sleeper {
    Arc::new(std::thread::sleep)
}

/// 固定回数・固定間隔のリトライ方針
///
/// 指数バックオフやジッターは無い。既定ではエラーの種類を区別せず全て再試行する。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
    retry_all_errors: bool,
}

impl RetryPolicy {
    /// `max_retries` は試行回数の上限（0 を指定しても1回は試行する）
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            retry_all_errors: true,
        }
    }

    /// `false` にすると再試行不能なエラーで即座に打ち切る
    pub fn retry_all_errors(mut self, retry_all: bool) -> Self {
        self.retry_all_errors = retry_all;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// 実際に行う試行回数
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn retries_all_errors(&self) -> bool {
        self.retry_all_errors
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RetryPolicy(max_retries={}, delay={:?}, retry_all_errors={})",
            self.max_retries, self.delay, self.retry_all_errors
        )
    }
}
