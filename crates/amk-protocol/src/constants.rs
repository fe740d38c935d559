//! 定点数标定常量
//!
//! 所有标定值来自 AMK Racing Kit 规格书（DD5 电机 + KW26 变流器），
//! 属于厂商协议约定，不可自行调整。

/// 电机额定转矩 Mn (N·m)
///
/// 协议中所有转矩定点值的基准：1 LSB = 0.1% Mn。
pub const NOMINAL_TORQUE_NM: f32 = 9.8;

/// 转矩定点值分辨率 (N·m/LSB)
pub const TORQUE_LSB_NM: f32 = NOMINAL_TORQUE_NM / 1000.0;

/// 变流器峰值电流 (A)，对应电流原始值满量程 16384
pub const CONVERTER_PEAK_CURRENT_A: f32 = 107.2;

/// 电流定点值分辨率 (A/LSB)
pub const CURRENT_LSB_A: f32 = CONVERTER_PEAK_CURRENT_A / 16384.0;

/// 转速分辨率 (rpm/LSB)
pub const VELOCITY_LSB_RPM: f32 = 1.0;

/// 直流母线电压分辨率 (V/LSB)
pub const DC_BUS_VOLTAGE_LSB_V: f32 = 1.0;

/// 实际功率分辨率 (W/LSB)
pub const POWER_LSB_W: f32 = 1.0;

/// 转矩 (N·m) 转定点原始值
///
/// 超出 i16 表示范围的值饱和到边界（±321 N·m 左右，远超电机物理能力）。
pub fn torque_to_raw(torque_nm: f32) -> i16 {
    let raw = (torque_nm / TORQUE_LSB_NM).round();
    raw.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// 定点原始值转转矩 (N·m)
pub fn raw_to_torque(raw: i16) -> f32 {
    raw as f32 * TORQUE_LSB_NM
}

/// 定点原始值转电流 (A)
pub fn raw_to_current(raw: i16) -> f32 {
    raw as f32 * CURRENT_LSB_A
}
