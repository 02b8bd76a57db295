//! 协议错误类型定义

/// 协议通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 串口错误（端口不存在、被占用等）
    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),

    /// 报文格式错误
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// 通道关闭
    #[error("channel closed")]
    ChannelClosed,
}

/// 报文格式错误：只影响当前行。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("empty line")]
    EmptyLine,

    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("invalid node id: {0:?}")]
    InvalidNodeId(String),

    #[error("invalid value: {0:?}")]
    InvalidValue(String),
}
