//! # AMK Protocol
//!
//! AMK Racing Kit 逆变器 CAN 总线协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: CAN ID 偏移常量定义
//! - `constants`: 定点数标定常量
//! - `feedback`: 状态/遥测帧解析 (Actual Values 1/2)
//! - `control`: 设定值帧构建 (Setpoints 1)
//!
//! ## 字节序
//!
//! 协议使用 Intel (LSB) 低位在前（小端字节序），
//! 本模块提供了字节序转换工具函数。

pub mod constants;
pub mod control;
pub mod feedback;
pub mod ids;

// 重新导出常用类型
pub use constants::*;
pub use control::*;
pub use feedback::*;
pub use ids::*;

/// CAN 2.0 标准帧的统一抽象
///
/// `AmkFrame` 是协议层和硬件层之间的中间抽象：协议层不依赖底层 CAN 实现，
/// 上层通过 `CanTransport` trait 使用统一的帧类型。
///
/// # 设计特性
///
/// - **Copy trait**：零成本复制，适合高频 CAN 场景
/// - **固定 8 字节**：避免堆分配
/// - **仅标准帧**：AMK 逆变器协议只使用 11-bit ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmkFrame {
    /// CAN ID（11-bit 标准帧）
    pub id: u16,

    /// 帧数据（固定 8 字节，未使用部分为 0）
    pub data: [u8; 8],

    /// 有效数据长度 (0-8)
    pub len: u8,
}

impl AmkFrame {
    /// 创建标准帧
    pub fn new(id: u16, data: &[u8]) -> Self {
        let mut fixed_data = [0u8; 8];
        let len = data.len().min(8);
        fixed_data[..len].copy_from_slice(&data[..len]);

        Self {
            id,
            data: fixed_data,
            len: len as u8,
        }
    }

    /// 获取数据切片（只包含有效数据）
    pub fn data_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid CAN ID: 0x{id:X}")]
    InvalidCanId { id: u16 },
}

/// 字节序转换工具函数
///
/// 协议使用 Intel (LSB) 低位在前（小端字节序），
/// 这些函数用于在协议层进行字节序转换。
///
/// 小端字节序转 u16
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// 小端字节序转 i16
pub fn bytes_to_i16_le(bytes: [u8; 2]) -> i16 {
    i16::from_le_bytes(bytes)
}

/// 小端字节序转 i32
pub fn bytes_to_i32_le(bytes: [u8; 4]) -> i32 {
    i32::from_le_bytes(bytes)
}

/// u16 转小端字节序
pub fn u16_to_bytes_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// i16 转小端字节序
pub fn i16_to_bytes_le(value: i16) -> [u8; 2] {
    value.to_le_bytes()
}
