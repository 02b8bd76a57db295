//! # 协议引擎
//!
//! 中心节点的状态机：
//!
//! ```text
//! INIT ──settle──► CHANNELS_OPEN ──1.0──► ANNOUNCED ──► DISCOVERING
//!                                                          │
//!                                  ready ──2.0──► READING ◄┤
//!                                                          │
//!                                  !ready ──────► IDLE   ◄─┘
//! ```
//!
//! READING 与 IDLE 都是终态：IDLE 不会重新发起发现。

mod config;
mod engine;
mod state;

pub use config::EngineConfig;
pub use engine::ProtocolEngine;
pub use state::{EnginePhase, EngineState};
