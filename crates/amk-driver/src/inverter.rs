//! 设备记录：解码写入、状态分类、出站请求
//!
//! 每台物理逆变器对应一个 [`Inverter`]。解码字段由多种帧分片更新，
//! 读写双方共用同一把设备锁，避免观察到撕裂的字段组合。

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use amk_can::CanTransport;
use amk_protocol::{
    ActualValues1, ActualValues2, AmkFrame, DEFAULT_BASE_IDS, ProtocolError, Setpoints1,
    actual_values_1_id, actual_values_2_id,
};

use crate::error::InverterError;
use crate::state::InverterState;

/// 共享的发送能力句柄
///
/// 设备在构造时绑定到一个总线句柄；多台设备可共享同一条总线。
pub type SharedTransport = Arc<Mutex<dyn CanTransport + Send>>;

/// 逆变器配置
#[derive(Debug, Clone)]
pub struct InverterConfig {
    /// 基 ID，状态/遥测/请求帧 ID 由此加固定偏移推导
    pub base_id: u16,
    /// 数据时效窗口：超过该时长未成功解码即视为失效
    pub timeout: Duration,
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            base_id: DEFAULT_BASE_IDS[0],
            timeout: Duration::from_millis(100),
        }
    }
}

/// 解码字段缓存（锁内数据）
#[derive(Debug, Clone, Copy, Default)]
struct InverterFields {
    /// 最后一次成功解码的时刻，`None` 表示从未收到
    last_update: Option<Instant>,

    system_ready: bool,
    error: bool,
    warning: bool,
    /// 母线使能应答位（与指令位 `dc_on` 分开建模）
    quit_dc_on: bool,
    dc_on: bool,
    /// 逆变器励磁应答位（与指令位 `inverter_on` 分开建模）
    quit_inverter: bool,
    inverter_on: bool,
    derating: bool,

    actual_torque: f32,
    actual_speed: f32,
    dc_bus_voltage: f32,
    torque_current: f32,
    magnetizing_current: f32,
    actual_power: f32,
}

/// 一次锁内读取的完整字段快照
///
/// 需要比五态枚举更细粒度（例如区分"已请求未确认"）的调用方
/// 通过快照读取原始标志位。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverterSnapshot {
    /// 读取时刻数据是否已失效
    pub stale: bool,

    pub system_ready: bool,
    pub error: bool,
    pub warning: bool,
    pub quit_dc_on: bool,
    pub dc_on: bool,
    pub quit_inverter: bool,
    pub inverter_on: bool,
    pub derating: bool,

    /// 实际转矩 (N·m)
    pub actual_torque: f32,
    /// 实际转速 (rpm)
    pub actual_speed: f32,
    /// 母线电压 (V)
    pub dc_bus_voltage: f32,
    /// 转矩电流 Iq (A)
    pub torque_current: f32,
    /// 励磁电流 Id (A)
    pub magnetizing_current: f32,
    /// 实际功率 (W)，回馈为负
    pub actual_power: f32,
}

/// AMK 逆变器设备记录
///
/// 在配置时绑定一个基 ID 和一个总线句柄，整个运行周期内由
/// 入站帧持续更新，正常运行中不销毁。
pub struct Inverter {
    base_id: u16,
    timeout: Duration,
    can: SharedTransport,
    fields: Mutex<InverterFields>,
}

impl Inverter {
    /// 创建设备记录并绑定总线句柄
    pub fn new(config: InverterConfig, can: SharedTransport) -> Self {
        Self {
            base_id: config.base_id,
            timeout: config.timeout,
            can,
            fields: Mutex::new(InverterFields::default()),
        }
    }

    /// 设备基 ID
    pub fn base_id(&self) -> u16 {
        self.base_id
    }

    /// 判断某个 CAN ID 是否属于本设备的反馈帧
    ///
    /// 宿主的接收分发循环用它将帧路由到对应设备。
    pub fn handles(&self, id: u16) -> bool {
        id == actual_values_1_id(self.base_id) || id == actual_values_2_id(self.base_id)
    }

    // ==================== 解码路径 ====================

    /// 解码一帧反馈并写入字段缓存
    ///
    /// 返回 `Ok(true)` 表示帧被本设备消费，`Ok(false)` 表示 ID 不属于
    /// 本设备。成功解码会刷新时效时间戳。解码路径从不阻塞。
    ///
    /// 解码出矛盾的应答组合（`quit_dc_on` 置位而 `dc_on` 未置位）时，
    /// 缓存保持总线上收到的原样，不做静默"修正"；保守偏置在分类
    /// 阶段施加。
    pub fn handle_frame(&self, frame: &AmkFrame) -> Result<bool, ProtocolError> {
        if frame.id == actual_values_1_id(self.base_id) {
            let values = ActualValues1::try_from(frame)?;
            let status = values.status;

            if status.quit_dc_on() && !status.dc_on() {
                // 应答不可能先于或晚于请求存在，视为总线损坏
                warn!(
                    base_id = self.base_id,
                    "acknowledgement without request: quit_dc_on set while dc_on clear"
                );
            }

            let mut fields = self.fields.lock();
            fields.system_ready = status.system_ready();
            fields.error = status.error();
            fields.warning = status.warning();
            fields.quit_dc_on = status.quit_dc_on();
            fields.dc_on = status.dc_on();
            fields.quit_inverter = status.quit_inverter();
            fields.inverter_on = status.inverter_on();
            fields.derating = status.derating();
            fields.actual_speed = values.actual_speed();
            fields.torque_current = values.torque_current();
            fields.magnetizing_current = values.magnetizing_current();
            fields.last_update = Some(Instant::now());
            drop(fields);

            trace!(base_id = self.base_id, "decoded actual values 1");
            Ok(true)
        } else if frame.id == actual_values_2_id(self.base_id) {
            let values = ActualValues2::try_from(frame)?;

            let mut fields = self.fields.lock();
            fields.dc_bus_voltage = values.dc_bus_voltage();
            fields.actual_torque = values.actual_torque();
            fields.actual_power = values.actual_power();
            fields.last_update = Some(Instant::now());
            drop(fields);

            trace!(base_id = self.base_id, "decoded actual values 2");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ==================== 状态读取 ====================

    /// 数据是否已失效（超时未刷新或从未收到）
    pub fn is_stale(&self) -> bool {
        let fields = self.fields.lock();
        stale(&fields, self.timeout)
    }

    /// 获取当前概括状态（纯读取，无副作用）
    pub fn state(&self) -> InverterState {
        let fields = self.fields.lock();
        classify(&fields, stale(&fields, self.timeout))
    }

    /// 最后缓存的实际功率 (W)
    ///
    /// 功率是尽力而为的遥测量而非安全门：数据失效的设备仍然
    /// 贡献其最后缓存值。
    pub fn power(&self) -> f32 {
        self.fields.lock().actual_power
    }

    /// 在一次锁持有期间读取全部字段
    pub fn snapshot(&self) -> InverterSnapshot {
        let fields = self.fields.lock();
        InverterSnapshot {
            stale: stale(&fields, self.timeout),
            system_ready: fields.system_ready,
            error: fields.error,
            warning: fields.warning,
            quit_dc_on: fields.quit_dc_on,
            dc_on: fields.dc_on,
            quit_inverter: fields.quit_inverter,
            inverter_on: fields.inverter_on,
            derating: fields.derating,
            actual_torque: fields.actual_torque,
            actual_speed: fields.actual_speed,
            dc_bus_voltage: fields.dc_bus_voltage,
            torque_current: fields.torque_current,
            magnetizing_current: fields.magnetizing_current,
            actual_power: fields.actual_power,
        }
    }

    // ==================== 出站请求 ====================

    /// 请求使能/去使能逆变器
    ///
    /// 只编码指令位；两级上电（母线应答在先，励磁在后）的时序由
    /// 调用方基于 [`Inverter::state`] 轮询驱动。任何非 `Ok` 结果都
    /// 应视为"动作未知"，重试前先重新读取状态。
    pub fn request_energization(
        &self,
        energize: bool,
        timeout: Duration,
    ) -> Result<(), InverterError> {
        debug!(base_id = self.base_id, energize, "energization request");
        self.send(Setpoints1::energization(energize), timeout)
    }

    /// 请求指定转矩（附对称/非对称限幅）
    ///
    /// 要求 `limit_negative <= torque <= limit_positive`，否则拒绝并
    /// 返回 [`InverterError::TorqueOutOfRange`]（不做钳制）。协议层面
    /// 转矩设定与使能位同帧，故本请求隐含一次使能请求。
    pub fn request_torque(
        &self,
        torque: f32,
        limit_positive: f32,
        limit_negative: f32,
        timeout: Duration,
    ) -> Result<(), InverterError> {
        // NaN 也会落入拒绝分支
        if !(limit_negative <= torque && torque <= limit_positive) {
            return Err(InverterError::TorqueOutOfRange {
                torque,
                limit_positive,
                limit_negative,
            });
        }

        debug!(base_id = self.base_id, torque, "torque request");
        self.send(
            Setpoints1::torque(torque, limit_positive, limit_negative),
            timeout,
        )
    }

    /// 请求清除系统错误
    ///
    /// 无错误时在协议层面是空操作，但照常发送；是否执行由设备决定。
    pub fn request_error_reset(&self, timeout: Duration) -> Result<(), InverterError> {
        debug!(base_id = self.base_id, "error reset request");
        self.send(Setpoints1::error_reset(), timeout)
    }

    /// 在设备锁内完成编码与发送，按请求粒度串行化
    fn send(&self, setpoints: Setpoints1, timeout: Duration) -> Result<(), InverterError> {
        let _fields = self.fields.lock();
        self.can
            .lock()
            .transmit(setpoints.to_frame(self.base_id), timeout)
            .map_err(InverterError::from)
    }
}

fn stale(fields: &InverterFields, timeout: Duration) -> bool {
    match fields.last_update {
        Some(at) => at.elapsed() > timeout,
        None => true,
    }
}

/// 状态分类（判定顺序即优先级，首个命中生效）
///
/// 对全部标志组合都有定义，从不 panic。两处矛盾组合按保守方向偏置：
///
/// - `quit_dc_on && !dc_on`（应答无请求）→ `Error`。规格书未定义该
///   组合，此处按总线损坏的保守解读处理，待厂商文档确认。
/// - `quit_inverter && !quit_dc_on` → 忽略 `quit_inverter`，不上报
///   `ReadyEnergized`。
fn classify(fields: &InverterFields, stale: bool) -> InverterState {
    if stale {
        InverterState::Invalid
    } else if fields.error {
        InverterState::Error
    } else if !fields.system_ready {
        // 无错误但未就绪的设备报告不出可用状态
        InverterState::Invalid
    } else if fields.quit_dc_on && !fields.dc_on {
        InverterState::Error
    } else if fields.quit_inverter && fields.quit_dc_on {
        InverterState::ReadyEnergized
    } else if fields.quit_dc_on {
        InverterState::ReadyHighVoltage
    } else {
        InverterState::ReadyLowVoltage
    }
}
