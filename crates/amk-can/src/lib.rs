//! # AMK CAN Adapter Layer
//!
//! CAN 硬件抽象层，提供驱动层消费的统一发送接口。
//!
//! 本 crate 不实现任何具体后端：物理总线的时序、仲裁与帧调度
//! 属于宿主的传输层。驱动层只依赖 [`CanTransport`] 这一能力，
//! 接收路径由宿主的分发循环将帧交给各设备的解码入口。

use std::time::Duration;
use thiserror::Error;

// 重新导出 amk-protocol 中的 AmkFrame
pub use amk_protocol::AmkFrame;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockTransport;

/// CAN 适配层统一错误类型
///
/// 发送超时返回 [`CanError::Timeout`]。注意超时仅表示总线级完成
/// 未在时限内被确认，帧本身无法撤回——调用方必须把超时当作
/// "结果未知"处理，而不是"一定失败"。
#[derive(Error, Debug)]
pub enum CanError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transmit timeout")]
    Timeout,

    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Device not started")]
    NotStarted,
}

/// CAN 发送能力
///
/// 由宿主传输层实现并在设备构造时注入。实现必须在 `timeout`
/// 内等待总线级发送完成，不得在内部重试。
pub trait CanTransport {
    /// 发送一帧，阻塞等待总线级完成，最多等待 `timeout`
    fn transmit(&mut self, frame: AmkFrame, timeout: Duration) -> Result<(), CanError>;
}
