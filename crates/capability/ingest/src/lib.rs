//! # 数据接入能力模块
//!
//! - [`DiscoveryCoordinator`]：滑动空闲超时的发现窗口，收集各节点上报的传感器描述
//! - [`ReadingDispatcher`]：读数阶段的常驻循环，过滤、解码并转交 sink
//!
//! 两个循环共用同一过滤规则：第一个字段为自动化节点 ID 的行一律丢弃，
//! 格式错误的行记录告警后跳过，不影响后续行。

mod discovery;
mod dispatch;
mod filter;

pub use discovery::{DiscoveryConfig, DiscoveryCoordinator, DiscoveryOutcome};
pub use dispatch::{DispatchOutcome, DispatchSummary, ReadingDispatcher};
pub use filter::{Inbound, classify};
