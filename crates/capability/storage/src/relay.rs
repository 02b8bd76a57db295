//! 中继转发实现
//!
//! 将注册表和读数按总线报文格式写到第二条行通道，
//! 由中继端（XBee 无线模块等）透传给远端。
//!
//! 中继通道可以晚于记录器创建：先以 [`RelayRecorder::detached`] 注册到 sink，
//! 等待期结束、通道打开后再 [`RelayRecorder::attach`]。

use crate::error::StorageError;
use crate::traits::RecordSink;
use bus_protocol::{LineChannel, encode_discovery_record, encode_reading_record};
use domain::{ReadingRecord, SensorDescriptor};
use tokio::sync::Mutex;
use tracing::debug;

/// 中继记录器
pub struct RelayRecorder<C: LineChannel> {
    channel: Mutex<Option<C>>,
}

impl<C: LineChannel> RelayRecorder<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel: Mutex::new(Some(channel)),
        }
    }

    /// 尚未连接通道的记录器；连接前的写入返回错误。
    pub fn detached() -> Self {
        Self {
            channel: Mutex::new(None),
        }
    }

    /// 连接（或替换）中继通道。
    pub async fn attach(&self, channel: C) {
        *self.channel.lock().await = Some(channel);
    }

    pub async fn is_attached(&self) -> bool {
        self.channel.lock().await.is_some()
    }
}

fn not_attached() -> StorageError {
    StorageError::new("relay channel not attached")
}

#[async_trait::async_trait]
impl<C: LineChannel> RecordSink for RelayRecorder<C> {
    async fn on_discovery_complete(
        &self,
        registry: &[SensorDescriptor],
    ) -> Result<(), StorageError> {
        let mut guard = self.channel.lock().await;
        let channel = guard.as_mut().ok_or_else(not_attached)?;
        for descriptor in registry {
            channel
                .write_line(&encode_discovery_record(descriptor))
                .await?;
        }
        debug!(target: "bus.storage", count = registry.len(), "registry_relayed");
        Ok(())
    }

    async fn on_reading(&self, reading: &ReadingRecord) -> Result<(), StorageError> {
        let mut guard = self.channel.lock().await;
        let channel = guard.as_mut().ok_or_else(not_attached)?;
        channel.write_line(&encode_reading_record(reading)).await?;
        Ok(())
    }
}
