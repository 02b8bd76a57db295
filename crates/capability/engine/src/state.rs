use domain::Registry;
use std::fmt;

/// 引擎阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// 等待各节点完成初始化
    Init,
    /// 通道已打开
    ChannelsOpen,
    /// 已发送连接公告
    Announced,
    /// 发现窗口进行中
    Discovering,
    /// 读数阶段（终态）
    Reading,
    /// 无节点上报，不再动作（终态）
    Idle,
}

impl EnginePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Reading | Self::Idle)
    }
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ChannelsOpen => "channels_open",
            Self::Announced => "announced",
            Self::Discovering => "discovering",
            Self::Reading => "reading",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// 引擎持有的全部运行状态。
#[derive(Debug, Clone)]
pub struct EngineState {
    pub phase: EnginePhase,
    /// 发现窗口结束后的注册表（只读）
    pub registry: Registry,
    pub ready: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            phase: EnginePhase::Init,
            registry: Registry::new(),
            ready: false,
        }
    }
}
