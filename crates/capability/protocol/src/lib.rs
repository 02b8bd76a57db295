//! # 总线行协议能力模块
//!
//! 中心节点与各传感器/执行器板卡通过共享串口，以分隔符文本行通信：
//! - **LineChannel**：按行收发的字节通道（串口实现、内存实现）
//! - **codec**：命令编码，发现报文/读数报文解码
//!
//! ## 架构设计
//!
//! ```text
//! 串口字节流
//!       │
//!       ▼
//! LineChannel::try_read_line（逐字节组帧，丢弃无法解码的字节）
//!       │
//!       ▼
//! codec::decode_first_field ──► 自动化节点报文过滤
//!       │
//!       ├── decode_discovery_record → SensorDescriptor
//!       └── decode_reading_record   → ReadingRecord
//! ```
//!
//! ## 报文格式
//!
//! - 结束符 `\n`，分隔符 `;`
//! - 出站命令：`1.0`（连接公告）、`2.0`（读数状态公告）
//! - 发现报文：`<id>;<name>;<step>;<unit>;<max>;<min>`
//! - 读数报文：`<id>;<value>`

mod channel;
pub mod codec;
mod error;
mod framing;
mod memory;
mod serial;

pub use channel::LineChannel;
pub use codec::{
    decode_discovery_record, decode_first_field, decode_reading_record, encode, encode_command,
    encode_discovery_record, encode_reading_record,
};
pub use error::{FormatError, ProtocolError};
pub use memory::MemoryLineChannel;
pub use serial::{SerialLineChannel, SerialSettings};
