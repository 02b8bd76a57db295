//! 记录接口 Trait 定义

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{ReadingRecord, SensorDescriptor};

/// 协议引擎的外部记录协作方。
///
/// 返回错误只会被记录，不会中断协议引擎。
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// 发现窗口结束，交出按上报顺序排列的传感器描述
    async fn on_discovery_complete(
        &self,
        registry: &[SensorDescriptor],
    ) -> Result<(), StorageError>;

    /// 收到一条读数
    async fn on_reading(&self, reading: &ReadingRecord) -> Result<(), StorageError>;
}
