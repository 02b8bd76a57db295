//! # 记录模块
//!
//! 协议引擎只通过 [`RecordSink`] 与外部协作方交互：
//! 发现窗口结束时交出注册表，读数阶段逐条交出读数。
//!
//! ## 实现
//!
//! - [`InMemoryRecorder`]：内存记录（测试、仿真）
//! - [`LogRecorder`]：写入结构化日志
//! - [`FileRecorder`]：按行追加 JSON 到记录目录（板载 SD 卡）
//! - [`RelayRecorder`]：通过第二条行通道转发（如 XBee 所在 USB 串口）
//! - [`FanoutRecorder`]：依次调用多个 sink
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use bus_storage::{FanoutRecorder, FileRecorder, LogRecorder, RecordSink};
//! use std::sync::Arc;
//!
//! let file = FileRecorder::create("/media/sd/records", &session_id).await?;
//! let sink: Arc<dyn RecordSink> = Arc::new(FanoutRecorder::new(vec![
//!     Arc::new(LogRecorder),
//!     Arc::new(file),
//! ]));
//! ```

pub mod error;
pub mod fanout;
pub mod file;
pub mod in_memory;
pub mod log;
pub mod relay;
pub mod traits;

pub use error::StorageError;
pub use fanout::FanoutRecorder;
pub use file::FileRecorder;
pub use in_memory::InMemoryRecorder;
pub use log::LogRecorder;
pub use relay::RelayRecorder;
pub use traits::RecordSink;
