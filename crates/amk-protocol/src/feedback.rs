//! 状态/遥测帧解析
//!
//! 包含逆变器周期性广播的两种反馈帧：
//!
//! - Actual Values 1（状态帧）：状态字 + 实际转速 + 转矩电流 + 励磁电流
//! - Actual Values 2（遥测帧）：母线电压 + 实际转矩 + 实际功率
//!
//! 位布局与标定来自 AMK Racing Kit 规格书，必须逐字节保持一致，
//! 否则无法与逆变器固件互操作。

use bilge::prelude::*;

use crate::{
    AmkFrame, ProtocolError, bytes_to_i16_le, bytes_to_i32_le, bytes_to_u16_le, constants::*,
};

/// 状态字 (AMK_Status)
///
/// Actual Values 1 帧 Byte 0-1，低 8 位保留，状态位在高字节。
///
/// 注意 `quit_dc_on` / `quit_inverter` 是应答位：分别在 `dc_on` /
/// `inverter_on` 指令位被观察到且对应能级就绪后才置位。应答位与指令位
/// 必须分开建模，上层才能区分"已请求未确认"与"已确认"。
#[bitsize(16)]
#[derive(FromBits, DebugBits, Clone, Copy, PartialEq, Eq)]
pub struct AmkStatus {
    reserved: u8,

    /// Bit 8: 系统就绪且无错误
    pub system_ready: bool,

    /// Bit 9: 存在系统错误
    pub error: bool,

    /// Bit 10: 存在系统警告
    pub warning: bool,

    /// Bit 11: 直流母线已使能且已充电的应答位
    pub quit_dc_on: bool,

    /// Bit 12: 直流母线使能指令位（是否充电见 `quit_dc_on`）
    pub dc_on: bool,

    /// Bit 13: 逆变器已使能且已励磁的应答位
    pub quit_inverter: bool,

    /// Bit 14: 逆变器使能指令位（是否励磁见 `quit_inverter`）
    pub inverter_on: bool,

    /// Bit 15: 输出转矩正在被硬件降额
    pub derating: bool,
}

/// 状态帧 (Actual Values 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActualValues1 {
    pub status: AmkStatus,            // Byte 0-1: 状态字
    pub actual_velocity_raw: i16,     // Byte 2-3: 实际转速 (1 rpm/LSB)
    pub torque_current_raw: i16,      // Byte 4-5: 转矩电流 Iq（定点原始值）
    pub magnetizing_current_raw: i16, // Byte 6-7: 励磁电流 Id（定点原始值）
}

impl ActualValues1 {
    /// 实际转速 (rpm)
    pub fn actual_speed(&self) -> f32 {
        self.actual_velocity_raw as f32 * VELOCITY_LSB_RPM
    }

    /// 转矩电流 (A)
    pub fn torque_current(&self) -> f32 {
        raw_to_current(self.torque_current_raw)
    }

    /// 励磁电流 (A)
    pub fn magnetizing_current(&self) -> f32 {
        raw_to_current(self.magnetizing_current_raw)
    }
}

impl TryFrom<&AmkFrame> for ActualValues1 {
    type Error = ProtocolError;

    fn try_from(frame: &AmkFrame) -> Result<Self, ProtocolError> {
        if (frame.len as usize) < 8 {
            return Err(ProtocolError::InvalidLength {
                expected: 8,
                actual: frame.len as usize,
            });
        }

        let d = &frame.data;
        Ok(Self {
            status: AmkStatus::from(bytes_to_u16_le([d[0], d[1]])),
            actual_velocity_raw: bytes_to_i16_le([d[2], d[3]]),
            torque_current_raw: bytes_to_i16_le([d[4], d[5]]),
            magnetizing_current_raw: bytes_to_i16_le([d[6], d[7]]),
        })
    }
}

/// 遥测帧 (Actual Values 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActualValues2 {
    pub dc_bus_voltage_raw: u16, // Byte 0-1: 母线电压 (1 V/LSB)
    pub actual_torque_raw: i16,  // Byte 2-3: 实际转矩 (0.1% Mn/LSB)
    pub actual_power_raw: i32,   // Byte 4-7: 实际功率 (1 W/LSB，回馈为负)
}

impl ActualValues2 {
    /// 母线电压 (V)
    pub fn dc_bus_voltage(&self) -> f32 {
        self.dc_bus_voltage_raw as f32 * DC_BUS_VOLTAGE_LSB_V
    }

    /// 实际转矩 (N·m)，降额时可能低于请求值
    pub fn actual_torque(&self) -> f32 {
        raw_to_torque(self.actual_torque_raw)
    }

    /// 实际功率 (W)，能量回馈时为负
    pub fn actual_power(&self) -> f32 {
        self.actual_power_raw as f32 * POWER_LSB_W
    }
}

impl TryFrom<&AmkFrame> for ActualValues2 {
    type Error = ProtocolError;

    fn try_from(frame: &AmkFrame) -> Result<Self, ProtocolError> {
        if (frame.len as usize) < 8 {
            return Err(ProtocolError::InvalidLength {
                expected: 8,
                actual: frame.len as usize,
            });
        }

        let d = &frame.data;
        Ok(Self {
            dc_bus_voltage_raw: bytes_to_u16_le([d[0], d[1]]),
            actual_torque_raw: bytes_to_i16_le([d[2], d[3]]),
            actual_power_raw: bytes_to_i32_le([d[4], d[5], d[6], d[7]]),
        })
    }
}
