//! 设定值帧构建 (Setpoints 1)
//!
//! 控制器通过请求帧向逆变器下发使能/转矩/错误复位指令。
//! 注意协议层面不存在独立的"转矩帧"：任何转矩设定都与控制字
//! 同帧发送，因此转矩请求隐含一次使能请求。

use bilge::prelude::*;

use crate::{
    AmkFrame, ProtocolError, bytes_to_i16_le, bytes_to_u16_le, constants::torque_to_raw,
    i16_to_bytes_le, ids::setpoints_id, u16_to_bytes_le,
};

/// 控制字 (AMK_Control)
///
/// Setpoints 1 帧 Byte 0-1，指令位在高字节。
#[bitsize(16)]
#[derive(FromBits, DebugBits, Clone, Copy, PartialEq, Eq)]
pub struct AmkControl {
    reserved: u8,

    /// Bit 8: 逆变器使能指令
    pub inverter_on: bool,

    /// Bit 9: 直流母线使能指令
    pub dc_on: bool,

    /// Bit 10: 输出级使能指令
    pub enable: bool,

    /// Bit 11: 错误复位指令（无错误时逆变器忽略）
    pub error_reset: bool,

    reserved: u4,
}

/// 设定值指令帧 (Setpoints 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setpoints1 {
    pub control: AmkControl,           // Byte 0-1: 控制字
    pub torque_setpoint_raw: i16,      // Byte 2-3: 转矩设定值 (0.1% Mn/LSB)
    pub torque_limit_positive_raw: i16, // Byte 4-5: 正向转矩限幅
    pub torque_limit_negative_raw: i16, // Byte 6-7: 负向转矩限幅
}

impl Setpoints1 {
    /// 创建使能/去使能请求（零转矩设定）
    ///
    /// 两级上电的时序（先母线、后逆变器）由调用方基于状态轮询驱动，
    /// 本帧只编码指令位本身。
    pub fn energization(energize: bool) -> Self {
        let mut control = AmkControl::from(0u16);
        control.set_inverter_on(energize);
        control.set_dc_on(energize);
        control.set_enable(energize);

        Self {
            control,
            torque_setpoint_raw: 0,
            torque_limit_positive_raw: 0,
            torque_limit_negative_raw: 0,
        }
    }

    /// 创建转矩请求（单位 N·m，内部转定点值）
    ///
    /// 携带全部使能位：下发转矩设定在协议层面同时是一次使能请求。
    pub fn torque(torque_nm: f32, limit_positive_nm: f32, limit_negative_nm: f32) -> Self {
        let mut request = Self::energization(true);
        request.torque_setpoint_raw = torque_to_raw(torque_nm);
        request.torque_limit_positive_raw = torque_to_raw(limit_positive_nm);
        request.torque_limit_negative_raw = torque_to_raw(limit_negative_nm);
        request
    }

    /// 创建错误复位请求
    ///
    /// 无论当前是否有错误都照常发送，是否执行由逆变器决定。
    pub fn error_reset() -> Self {
        let mut control = AmkControl::from(0u16);
        control.set_error_reset(true);

        Self {
            control,
            torque_setpoint_raw: 0,
            torque_limit_positive_raw: 0,
            torque_limit_negative_raw: 0,
        }
    }

    /// 转换为 CAN 帧（ID 由设备基 ID 推导）
    pub fn to_frame(self, base_id: u16) -> AmkFrame {
        let mut data = [0u8; 8];
        data[0..2].copy_from_slice(&u16_to_bytes_le(self.control.into()));
        data[2..4].copy_from_slice(&i16_to_bytes_le(self.torque_setpoint_raw));
        data[4..6].copy_from_slice(&i16_to_bytes_le(self.torque_limit_positive_raw));
        data[6..8].copy_from_slice(&i16_to_bytes_le(self.torque_limit_negative_raw));

        AmkFrame::new(setpoints_id(base_id), &data)
    }
}

impl TryFrom<&AmkFrame> for Setpoints1 {
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
            control: AmkControl::from(bytes_to_u16_le([d[0], d[1]])),
            torque_setpoint_raw: bytes_to_i16_le([d[2], d[3]]),
            torque_limit_positive_raw: bytes_to_i16_le([d[4], d[5]]),
            torque_limit_negative_raw: bytes_to_i16_le([d[6], d[7]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_word_bit_positions() {
        let control = Setpoints1::energization(true).control;
        // inverter_on (bit 8) + dc_on (bit 9) + enable (bit 10) = 0x0700
        assert_eq!(u16::from(control), 0x0700);

        let control = Setpoints1::error_reset().control;
        // error_reset (bit 11)
        assert_eq!(u16::from(control), 0x0800);
    }

    #[test]
    fn test_energization_frame_layout() {
        let frame = Setpoints1::energization(true).to_frame(0x284);

        assert_eq!(frame.id, 0x286); // base + SETPOINTS_OFFSET
        assert_eq!(frame.len, 8);
        assert_eq!(frame.data, [0x00, 0x07, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_deenergization_clears_all_command_bits() {
        let frame = Setpoints1::energization(false).to_frame(0x284);
        assert_eq!(frame.data, [0u8; 8]);
    }

    #[test]
    fn test_torque_frame_layout() {
        // 9.8 N·m = 1000 LSB (0x03E8)，限幅 ±49 N·m = ±5000 LSB
        let frame = Setpoints1::torque(9.8, 49.0, -49.0).to_frame(0x280);

        assert_eq!(frame.id, 0x282);
        assert_eq!(frame.data[0..2], [0x00, 0x07]); // 隐含使能位
        assert_eq!(frame.data[2..4], [0xE8, 0x03]);
        assert_eq!(frame.data[4..6], [0x88, 0x13]); // 5000
        assert_eq!(frame.data[6..8], [0x78, 0xEC]); // -5000
    }

    #[test]
    fn test_setpoints_roundtrip() {
        let original = Setpoints1::torque(-4.9, 19.6, -19.6);
        let decoded = Setpoints1::try_from(&original.to_frame(0x288)).unwrap();
        assert_eq!(original, decoded);
    }
}
