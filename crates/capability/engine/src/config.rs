use bus_config::NodeConfig;
use bus_ingest::DiscoveryConfig;
use std::time::Duration;

/// 引擎参数。
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 发送任何报文前的等待
    pub settle_delay: Duration,
    pub discovery: DiscoveryConfig,
    /// 读数阶段传输错误后的退避
    pub retry_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5),
            discovery: DiscoveryConfig::default(),
            retry_interval: Duration::from_secs(1),
        }
    }
}

impl From<&NodeConfig> for EngineConfig {
    fn from(config: &NodeConfig) -> Self {
        Self {
            settle_delay: config.settle_delay(),
            discovery: DiscoveryConfig {
                idle_timeout: config.discovery_idle_timeout(),
                poll_interval: config.poll_interval(),
                automation_extends_window: config.automation_extends_window,
            },
            retry_interval: config.open_retry(),
        }
    }
}
