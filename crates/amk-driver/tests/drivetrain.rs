//! 四电机驱动系统的端到端场景测试
//!
//! 用 Mock 传输模拟一条共享总线上的四台逆变器，覆盖
//! 解码 → 分类 → 聚合 → 请求的完整链路。

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use amk_can::MockTransport;
use amk_driver::{
    Inverter, InverterConfig, InverterState, SharedTransport, group_power, group_state,
};
use amk_protocol::{AmkFrame, AmkStatus, DEFAULT_BASE_IDS, Setpoints1, actual_values_2_id};

const LONG: Duration = Duration::from_secs(3600);

fn drivetrain(
    timeouts: [Duration; 4],
) -> (Vec<Inverter>, Arc<Mutex<MockTransport>>) {
    let mock = Arc::new(Mutex::new(MockTransport::new()));
    let can: SharedTransport = mock.clone();

    let inverters = DEFAULT_BASE_IDS
        .iter()
        .zip(timeouts)
        .map(|(&base_id, timeout)| {
            Inverter::new(InverterConfig { base_id, timeout }, can.clone())
        })
        .collect();

    (inverters, mock)
}

/// 就绪 + 母线已应答的状态帧 (Actual Values 1)
fn high_voltage_status_frame(base_id: u16) -> AmkFrame {
    let status = AmkStatus::new(true, false, false, true, true, false, true, false);
    let mut data = [0u8; 8];
    data[0..2].copy_from_slice(&u16::from(status).to_le_bytes());
    AmkFrame::new(base_id, &data)
}

/// 指定功率的遥测帧 (Actual Values 2)
fn power_frame(base_id: u16, power_w: i32) -> AmkFrame {
    let mut data = [0u8; 8];
    data[0..2].copy_from_slice(&400u16.to_le_bytes());
    data[4..8].copy_from_slice(&power_w.to_le_bytes());
    AmkFrame::new(actual_values_2_id(base_id), &data)
}

/// 宿主分发循环的最小实现：把帧路由给声明处理它的设备
fn dispatch(inverters: &[Inverter], frame: &AmkFrame) {
    for inverter in inverters {
        if inverter.handles(frame.id) {
            inverter.handle_frame(frame).unwrap();
            return;
        }
    }
    panic!("frame 0x{:X} not claimed by any inverter", frame.id);
}

#[test]
fn stale_device_dominates_group_state() {
    // 三台正常 + 一台随后失效
    let (inverters, _) = drivetrain([LONG, LONG, LONG, Duration::from_millis(1)]);

    for inverter in &inverters[..3] {
        dispatch(&inverters, &high_voltage_status_frame(inverter.base_id()));
        dispatch(&inverters, &power_frame(inverter.base_id(), 100));
        assert_eq!(inverter.state(), InverterState::ReadyHighVoltage);
    }
    dispatch(&inverters, &high_voltage_status_frame(inverters[3].base_id()));
    dispatch(&inverters, &power_frame(inverters[3].base_id(), 5));

    std::thread::sleep(Duration::from_millis(10));
    assert_eq!(inverters[3].state(), InverterState::Invalid);

    // 失效设备拉低整组状态
    assert_eq!(group_state(&inverters), InverterState::Invalid);
    // 去掉失效设备后，组状态恢复为最差健康成员
    assert_eq!(group_state(&inverters[..3]), InverterState::ReadyHighVoltage);

    // 功率聚合不把失效当安全门：缓存值照常计入
    assert_eq!(group_power(&inverters), 305.0);
}

#[test]
fn group_state_equals_minimum_member_state() {
    let (inverters, _) = drivetrain([LONG; 4]);

    // 一台报错，其余高压就绪
    let error_status = AmkStatus::new(true, true, false, true, true, false, true, false);
    let mut data = [0u8; 8];
    data[0..2].copy_from_slice(&u16::from(error_status).to_le_bytes());
    dispatch(&inverters, &AmkFrame::new(inverters[0].base_id(), &data));

    for inverter in &inverters[1..] {
        dispatch(&inverters, &high_voltage_status_frame(inverter.base_id()));
    }

    let min_state = inverters.iter().map(Inverter::state).min().unwrap();
    assert_eq!(min_state, InverterState::Error);
    assert_eq!(group_state(&inverters), min_state);
}

#[test]
fn regenerating_devices_reduce_group_power() {
    let (inverters, _) = drivetrain([LONG; 4]);

    let powers = [10_000, -2_500, 0, 500];
    for (inverter, power) in inverters.iter().zip(powers) {
        dispatch(&inverters, &power_frame(inverter.base_id(), power));
    }

    assert_eq!(group_power(&inverters), 8_000.0);
}

#[test]
fn caller_driven_energization_sequence() {
    // 隐式状态机：调用方轮询状态、逐台下发下一步请求
    let (inverters, mock) = drivetrain([LONG; 4]);
    let inverter = &inverters[0];
    let timeout = Duration::from_millis(5);

    // 低压就绪 → 请求上电
    let status = AmkStatus::new(true, false, false, false, false, false, false, false);
    let mut data = [0u8; 8];
    data[0..2].copy_from_slice(&u16::from(status).to_le_bytes());
    dispatch(&inverters, &AmkFrame::new(inverter.base_id(), &data));
    assert_eq!(inverter.state(), InverterState::ReadyLowVoltage);

    inverter.request_energization(true, timeout).unwrap();

    // 母线应答到达 → 高压就绪 → 请求转矩（隐含使能）
    dispatch(&inverters, &high_voltage_status_frame(inverter.base_id()));
    assert_eq!(inverter.state(), InverterState::ReadyHighVoltage);

    inverter.request_torque(4.9, 9.8, -9.8, timeout).unwrap();

    {
        let mock = mock.lock();
        assert_eq!(mock.sent.len(), 2);
        // 两帧都发往该设备的请求 ID
        assert!(mock.sent.iter().all(|f| f.id == inverter.base_id() + 2));

        let sp = Setpoints1::try_from(mock.last_sent().unwrap()).unwrap();
        assert_eq!(sp.torque_setpoint_raw, 500); // 4.9 N·m = 500 LSB
        assert!(sp.control.inverter_on());
    }

    // 去使能收尾
    inverter.request_energization(false, timeout).unwrap();
    let mock = mock.lock();
    assert_eq!(mock.last_sent().unwrap().data, [0u8; 8]);
}
