//! 发现窗口
//!
//! ```text
//! deadline = now + idle_timeout
//! loop:
//!   now >= deadline          → 结束
//!   无可读行                  → 等待 min(poll_interval, deadline - now)
//!   自动化节点               → 丢弃（默认不重置 deadline）
//!   有效描述                  → 追加到注册表，deadline = now + idle_timeout
//!   格式错误                  → 告警并丢弃，不重置 deadline
//! ready = 注册表非空
//! ```

use crate::filter::{Inbound, classify};
use bus_protocol::{LineChannel, ProtocolError, decode_discovery_record};
use bus_telemetry::{
    record_automation_line_dropped, record_descriptor_registered, record_empty_line,
    record_line_received, record_malformed_line, record_transport_error,
};
use domain::Registry;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

/// 发现窗口参数。
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// 空闲超时：每收到一条有效描述即重新计时
    pub idle_timeout: Duration,
    /// 无数据时单次等待上限
    pub poll_interval: Duration,
    /// 自动化节点报文是否也重新计时
    pub automation_extends_window: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(300),
            poll_interval: Duration::from_millis(1),
            automation_extends_window: false,
        }
    }
}

/// 发现结果。
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryOutcome {
    pub registry: Registry,
    pub ready: bool,
}

/// 发现窗口协调器：窗口期间独占注册表，结束后整体交出。
pub struct DiscoveryCoordinator {
    config: DiscoveryConfig,
    registry: Registry,
}

impl DiscoveryCoordinator {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    /// 运行一次发现窗口。
    pub async fn run<C>(mut self, channel: &mut C) -> DiscoveryOutcome
    where
        C: LineChannel + ?Sized,
    {
        let idle_timeout = self.config.idle_timeout;
        let mut deadline = Instant::now() + idle_timeout;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            match channel.try_read_line().await {
                Ok(Some(line)) => {
                    if self.accept(&line) {
                        deadline = Instant::now() + idle_timeout;
                    }
                }
                Ok(None) => {
                    sleep_until(deadline.min(now + self.config.poll_interval)).await;
                }
                Err(ProtocolError::ChannelClosed) => {
                    info!(target: "bus.discovery", "channel closed during discovery window");
                    break;
                }
                Err(e) => {
                    record_transport_error();
                    warn!(target: "bus.discovery", error = %e, "read_failed");
                    sleep_until(deadline.min(now + self.config.poll_interval)).await;
                }
            }
        }

        let ready = !self.registry.is_empty();
        info!(
            target: "bus.discovery",
            descriptors = self.registry.len(),
            ready,
            "discovery_window_closed"
        );
        DiscoveryOutcome {
            registry: self.registry,
            ready,
        }
    }

    /// 处理一行，返回是否重新计时。
    fn accept(&mut self, line: &str) -> bool {
        let (sender, peer_line) = match classify(line) {
            Ok(Inbound::Empty) => {
                record_empty_line();
                return false;
            }
            Ok(Inbound::Automation(command)) => {
                record_line_received();
                record_automation_line_dropped();
                debug!(
                    target: "bus.discovery",
                    command = ?command,
                    line = %line,
                    "automation_line_dropped"
                );
                return self.config.automation_extends_window;
            }
            Ok(Inbound::Peer(sender, peer_line)) => (sender, peer_line),
            Err(e) => {
                record_line_received();
                record_malformed_line();
                warn!(target: "bus.discovery", line = %line, error = %e, "malformed_line_skipped");
                return false;
            }
        };

        record_line_received();
        match decode_discovery_record(peer_line) {
            Ok(descriptor) => {
                record_descriptor_registered();
                info!(
                    target: "bus.discovery",
                    id = %descriptor.id,
                    name = %descriptor.name,
                    unit = %descriptor.unit,
                    sender = %sender,
                    "descriptor_registered"
                );
                self.registry.push(descriptor);
                true
            }
            Err(e) => {
                record_malformed_line();
                warn!(
                    target: "bus.discovery",
                    sender = %sender,
                    line = %line,
                    error = %e,
                    "malformed_line_skipped"
                );
                false
            }
        }
    }
}
