//! 多机聚合
//!
//! 组不是持久实体：它是调用方按需在一个设备切片上计算出的
//! 瞬时视图，数组的所有权与生命周期完全属于调用方。
//!
//! 注意聚合跨越多把设备锁，观察到的是各设备"读取时刻各自最新"
//! 的状态而非一致性快照，组级别的先检查后动作只具参考意义。

use crate::inverter::Inverter;
use crate::state::InverterState;

/// 获取一组逆变器的全局状态（最差成员生效）
///
/// 共享直流母线下，一台不健康的逆变器即推翻整组的安全论证，
/// 因此组状态取各成员分类结果的最小值。空切片按约定返回
/// [`InverterState::Invalid`]：不存在可以就绪的设备。
pub fn group_state(inverters: &[Inverter]) -> InverterState {
    inverters
        .iter()
        .map(Inverter::state)
        .min()
        .unwrap_or(InverterState::Invalid)
}

/// 获取一组逆变器的总功率 (W)
///
/// 各设备最后缓存功率的代数和，回馈（负值）照常计入。与状态
/// 聚合对失效的保守处理不同，失效设备仍贡献其最后缓存值——
/// 功率是尽力而为的遥测量而非安全门，该差异是有意保留的。
pub fn group_power(inverters: &[Inverter]) -> f32 {
    inverters.iter().map(Inverter::power).sum()
}
