//! 驱动层错误类型定义

use amk_can::CanError;
use thiserror::Error;

/// 驱动层错误类型
///
/// 注意状态层面的异常（超时未刷新、设备报错）不走错误通道，
/// 而是体现为 [`crate::InverterState`] 的低优先级取值；这里只
/// 覆盖请求路径的失败。
#[derive(Error, Debug)]
pub enum InverterError {
    /// CAN 传输失败（超时或总线错误），不在内部重试
    #[error("CAN transport error: {0}")]
    Can(#[from] CanError),

    /// 转矩请求超出调用方给定的限幅（属于调用方编程错误，拒绝而非钳制）
    #[error("torque request {torque} Nm outside limits [{limit_negative}, {limit_positive}]")]
    TorqueOutOfRange {
        torque: f32,
        limit_positive: f32,
        limit_negative: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_can_error() {
        let err: InverterError = CanError::Timeout.into();
        assert!(matches!(err, InverterError::Can(CanError::Timeout)));
    }

    #[test]
    fn test_torque_out_of_range_display() {
        let err = InverterError::TorqueOutOfRange {
            torque: 75.0,
            limit_positive: 50.0,
            limit_negative: -50.0,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("75") && msg.contains("50"));
    }
}
