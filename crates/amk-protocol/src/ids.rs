//! CAN ID 偏移常量定义
//!
//! 每台逆变器占用一段连续的 CAN ID，由配置的基 ID (`base_id`) 加固定偏移得到。
//! 偏移值来自 AMK Racing Kit CAN 规格书，属于厂商协议约定，不可更改。

/// 状态帧 (Actual Values 1) 相对基 ID 的偏移
///
/// 携带状态字、实际转速、转矩电流、励磁电流。
pub const ACTUAL_VALUES_1_OFFSET: u16 = 0x000;

/// 遥测帧 (Actual Values 2) 相对基 ID 的偏移
///
/// 携带直流母线电压、实际转矩、实际功率。
pub const ACTUAL_VALUES_2_OFFSET: u16 = 0x001;

/// 请求帧 (Setpoints 1) 相对基 ID 的偏移
///
/// 由控制器发送：控制字、转矩设定值、正/负转矩限幅。
pub const SETPOINTS_OFFSET: u16 = 0x002;

/// 四电机驱动系统的出厂默认基 ID
///
/// 每台设备占用 3 个连续 ID（间隔 4 留有余量），
/// 实际基 ID 由 AMK 调试工具配置，可与默认值不同。
pub const DEFAULT_BASE_IDS: [u16; 4] = [0x280, 0x284, 0x288, 0x28C];

/// 计算指定设备的状态帧 ID
pub fn actual_values_1_id(base_id: u16) -> u16 {
    base_id + ACTUAL_VALUES_1_OFFSET
}

/// 计算指定设备的遥测帧 ID
pub fn actual_values_2_id(base_id: u16) -> u16 {
    base_id + ACTUAL_VALUES_2_OFFSET
}

/// 计算指定设备的请求帧 ID
pub fn setpoints_id(base_id: u16) -> u16 {
    base_id + SETPOINTS_OFFSET
}
