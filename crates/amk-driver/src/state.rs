//! 逆变器运行状态枚举
//!
//! 按相对优先级升序排列：数值越小的状态越"严重"，多机聚合时
//! 取最小值即取最差成员。判别值与线上编码一致，Rust 侧比较一律
//! 走 `Ord`，原始整数只出现在线级边界。

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 逆变器的概括运行状态
///
/// `Ord` 实现即优先级序：`Invalid < Error < ReadyLowVoltage <
/// ReadyHighVoltage < ReadyEnergized`。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum InverterState {
    /// 数据无效：设备超时未刷新或从未收到解码
    Invalid = 0,

    /// 设备报告系统错误
    Error = 1,

    /// 就绪且无错误，但高压未建立
    ReadyLowVoltage = 5,

    /// 就绪且无错误，直流母线已充电
    ReadyHighVoltage = 6,

    /// 就绪且无错误，电机已励磁
    ReadyEnergized = 7,
}
