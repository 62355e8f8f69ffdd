//! 定时器封装模块

use std::time::Duration;

use nestmatch::request::Timer;

/// 基于 `setTimeout` 的定时器，用作请求时限
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

#[async_trait::async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
