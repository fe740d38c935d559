//! Mock 传输实现（无硬件依赖）
//!
//! 记录所有发送的帧，并支持按调用顺序脚本化返回结果，
//! 用于驱动层的单元/集成测试。

use std::collections::VecDeque;
use std::time::Duration;

use tracing::trace;

use crate::{AmkFrame, CanError, CanTransport};

/// 可脚本化的 Mock 传输
///
/// 默认所有发送返回 `Ok(())`；通过 [`MockTransport::push_result`]
/// 预置的结果按 FIFO 顺序优先消费。
#[derive(Debug, Default)]
pub struct MockTransport {
    /// 按发送顺序记录的帧
    pub sent: Vec<AmkFrame>,
    /// 每次发送记录的超时参数
    pub timeouts: Vec<Duration>,
    results: VecDeque<Result<(), CanError>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置下一次发送的结果
    pub fn push_result(&mut self, result: Result<(), CanError>) {
        self.results.push_back(result);
    }

    /// 最后一次发送的帧
    pub fn last_sent(&self) -> Option<&AmkFrame> {
        self.sent.last()
    }
}

impl CanTransport for MockTransport {
    fn transmit(&mut self, frame: AmkFrame, timeout: Duration) -> Result<(), CanError> {
        trace!(id = frame.id, ?timeout, "mock transmit");
        self.sent.push(frame);
        self.timeouts.push(timeout);
        self.results.pop_front().unwrap_or(Ok(()))
    }
}
