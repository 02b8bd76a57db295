pub mod data;

pub use data::{ReadingRecord, Registry, SensorDescriptor};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 自动化节点 ID：其控制报文永远不作为数据处理。
pub const AUTOMATION_NODE_ID: NodeId = NodeId(0x001);

/// 总线节点标识（取自报文第一个字段）。`0` 保留给本节点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// 是否为自动化节点。
    pub fn is_automation(self) -> bool {
        self == AUTOMATION_NODE_ID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 总线命令码（以浮点字面量单独成行发送）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// 致命错误（保留，当前不发送）
    FatalError,
    /// 连接公告：请求各节点上报传感器描述
    Connection,
    /// 读数状态公告：各节点开始推送读数
    ReadingState,
    /// 关闭自动化（由自动化节点识别）
    AutomationOff,
    /// 开启自动化（由自动化节点识别）
    AutomationOn,
}

impl Command {
    pub fn code(self) -> f64 {
        match self {
            Self::FatalError => 0.0,
            Self::Connection => 1.0,
            Self::ReadingState => 2.0,
            Self::AutomationOff => 3.0,
            Self::AutomationOn => 4.0,
        }
    }

    /// 由命令码反查命令。
    pub fn from_code(code: f64) -> Option<Self> {
        [
            Self::FatalError,
            Self::Connection,
            Self::ReadingState,
            Self::AutomationOff,
            Self::AutomationOn,
        ]
        .into_iter()
        .find(|command| command.code() == code)
    }
}
