//! 节点运行配置加载。

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 节点运行配置。
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// 总线串口路径
    pub port_path: String,
    pub baud_rate: u32,
    /// 串口打开失败后的固定重试间隔
    pub open_retry_ms: u64,
    /// 启动后等待各节点完成初始化的时间
    pub settle_delay_ms: u64,
    /// 发现窗口空闲超时（每收到一条有效描述即重置）
    pub discovery_idle_timeout_ms: u64,
    /// 无数据时单次等待的上限
    pub poll_interval_ms: u64,
    /// 自动化节点报文是否也延长发现窗口
    pub automation_extends_window: bool,
    /// 中继串口（如 XBee 所在 USB 口），未设置则不转发
    pub relay_port_path: Option<String>,
    /// 记录目录，未设置则不落盘
    pub record_dir: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port_path: "/dev/ttyO4".to_string(),
            baud_rate: 9600,
            open_retry_ms: 1000,
            settle_delay_ms: 5000,
            discovery_idle_timeout_ms: 300,
            poll_interval_ms: 1,
            automation_extends_window: false,
            relay_port_path: None,
            record_dir: None,
        }
    }
}

impl NodeConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port_path = read_optional("BUS_PORT_PATH").unwrap_or(defaults.port_path);
        let baud_rate = read_u32_with_default("BUS_BAUD_RATE", defaults.baud_rate)?;
        if baud_rate == 0 {
            return Err(ConfigError::Invalid(
                "BUS_BAUD_RATE".to_string(),
                baud_rate.to_string(),
            ));
        }
        let open_retry_ms = read_u64_with_default("BUS_OPEN_RETRY_MS", defaults.open_retry_ms)?;
        let settle_delay_ms =
            read_u64_with_default("BUS_SETTLE_DELAY_MS", defaults.settle_delay_ms)?;
        let discovery_idle_timeout_ms = read_u64_with_default(
            "BUS_DISCOVERY_IDLE_TIMEOUT_MS",
            defaults.discovery_idle_timeout_ms,
        )?;
        let poll_interval_ms =
            read_u64_with_default("BUS_POLL_INTERVAL_MS", defaults.poll_interval_ms)?.max(1);
        let automation_extends_window = read_bool_with_default(
            "BUS_AUTOMATION_EXTENDS_WINDOW",
            defaults.automation_extends_window,
        );
        let relay_port_path = read_optional("BUS_RELAY_PORT_PATH");
        let record_dir = read_optional("BUS_RECORD_DIR").map(PathBuf::from);

        Ok(Self {
            port_path,
            baud_rate,
            open_retry_ms,
            settle_delay_ms,
            discovery_idle_timeout_ms,
            poll_interval_ms,
            automation_extends_window,
            relay_port_path,
            record_dir,
        })
    }

    pub fn open_retry(&self) -> Duration {
        Duration::from_millis(self.open_retry_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn discovery_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_idle_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
