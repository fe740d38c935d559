//! # AMK Driver
//!
//! AMK 逆变器设备模型：把传输层异步送达的原始反馈帧归约为类型化的
//! 设备状态，推导单机/多机的优先级运行状态，并编码出站请求。
//!
//! ## 架构分层
//!
//! - **协议层** (`amk-protocol`): 类型安全的帧编码/解码
//! - **CAN 层** (`amk-can`): 发送能力抽象（由宿主传输层实现）
//! - **驱动层** (本 crate): 设备记录、状态分类、组聚合、请求编码
//!
//! ## 并发模型
//!
//! 本 crate 不创建任何线程。每台设备的字段由该设备的锁串行化：
//! 解码路径在宿主的接收回调线程上写入，分类/请求在调用方线程上读取。
//! 不同设备的锁之间没有顺序保证，组聚合观察到的是各设备"读取时刻
//! 各自最新"的状态，而不是跨设备的一致性快照。
//!
//! ## 隐式状态机
//!
//! 本 crate 只提供原语，不提供时序策略。调用方通过轮询
//! [`Inverter::state`] 并下发下一步请求，驱动
//! 去使能 → 母线上电 → 逆变器励磁 → 错误/复位 的隐式状态机。

pub mod error;
pub mod group;
pub mod inverter;
pub mod state;

// 重新导出常用类型
pub use error::InverterError;
pub use group::{group_power, group_state};
pub use inverter::{Inverter, InverterConfig, InverterSnapshot, SharedTransport};
pub use state::InverterState;

// 跨层常用类型
pub use amk_can::{CanError, CanTransport};
pub use amk_protocol::{AmkFrame, ProtocolError};
